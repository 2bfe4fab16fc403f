use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetStatus {
    #[default]
    Ok,
    Maintenance,
    Offline,
}

/// Plant type; decides simulation constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetKind {
    Chp,
    Ccgt,
    Peaker,
}

impl AssetKind {
    /// Peaking engines idle at zero output rather than drawing power.
    pub fn clamps_power(self) -> bool {
        matches!(self, AssetKind::Peaker)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

/// Baseline and jitter amplitude for each simulated metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimParams {
    pub kind: AssetKind,
    pub power_base: f64,
    pub power_jitter: f64,
    pub efficiency_base: f64,
    pub efficiency_jitter: f64,
    pub emissions_base: f64,
    pub emissions_jitter: f64,
}

impl SimParams {
    pub fn is_valid(&self) -> bool {
        let values = [
            self.power_base,
            self.power_jitter,
            self.efficiency_base,
            self.efficiency_jitter,
            self.emissions_base,
            self.emissions_jitter,
        ];
        values.iter().all(|v| v.is_finite())
            && self.power_jitter >= 0.0
            && self.efficiency_jitter >= 0.0
            && self.emissions_jitter >= 0.0
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Asset {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub status: AssetStatus,
    pub sim: SimParams,
}

/// Wire shape of an asset: flat coordinates, no simulation parameters.
#[derive(Serialize)]
struct AssetWire<'a> {
    id: &'a str,
    name: &'a str,
    lat: Option<f64>,
    lng: Option<f64>,
    status: AssetStatus,
}

impl Serialize for Asset {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        AssetWire {
            id: &self.id,
            name: &self.name,
            lat: self.location.map(|l| l.lat),
            lng: self.location.map(|l| l.lng),
            status: self.status,
        }
        .serialize(serializer)
    }
}
