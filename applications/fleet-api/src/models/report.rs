use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRow {
    pub asset_id: String,
    pub name: String,
    #[serde(rename = "energyMWh")]
    pub energy_mwh: i64,
    pub avg_efficiency_pct: f64,
    #[serde(rename = "emissions95th")]
    pub emissions_95th: i64,
}
