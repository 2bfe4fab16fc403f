use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One generated reading. Field names on the wire are the legacy column
/// names the dashboard still expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySample {
    #[serde(rename = "ts")]
    pub timestamp: DateTime<Utc>,
    /// Electrical power (MW).
    #[serde(rename = "moisture")]
    pub power: f64,
    /// Electrical efficiency (%).
    #[serde(rename = "health")]
    pub efficiency: f64,
    /// NOx (ppm).
    #[serde(rename = "co2")]
    pub emissions: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryResponse {
    pub asset_id: String,
    pub series: Vec<TelemetrySample>,
}
