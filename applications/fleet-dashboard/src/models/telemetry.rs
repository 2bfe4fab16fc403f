use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A reading as served by `/telemetry`. The service still uses the legacy
/// column names on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySample {
    #[serde(rename = "ts")]
    pub timestamp: DateTime<Utc>,
    /// Electrical power (MW)
    #[serde(rename = "moisture")]
    pub power: f64,
    /// Electrical efficiency (%)
    #[serde(rename = "health")]
    pub efficiency: f64,
    /// NOx (ppm)
    #[serde(rename = "co2")]
    pub emissions: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetrySeries {
    pub asset_id: String,
    #[serde(default)]
    pub series: Vec<TelemetrySample>,
}
