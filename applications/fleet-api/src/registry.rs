use std::collections::HashSet;

use crate::error::{AppError, Result};
use crate::models::{Asset, AssetKind, AssetStatus, Location, SimParams};

/// Read-only list of monitored assets, loaded once at startup.
#[derive(Debug, Clone)]
pub struct AssetRegistry {
    assets: Vec<Asset>,
}

impl AssetRegistry {
    pub fn new(assets: Vec<Asset>) -> Result<Self> {
        let mut seen = HashSet::new();
        for asset in &assets {
            if asset.id.is_empty() {
                return Err(AppError::Config("asset id cannot be empty".to_string()));
            }
            if !seen.insert(asset.id.as_str()) {
                return Err(AppError::Config(format!(
                    "duplicate asset id: {}",
                    asset.id
                )));
            }
        }
        Ok(Self { assets })
    }

    /// The three demo plants.
    pub fn demo() -> Self {
        Self {
            assets: demo_assets(),
        }
    }

    pub fn all(&self) -> &[Asset] {
        &self.assets
    }

    pub fn get(&self, id: &str) -> Option<&Asset> {
        self.assets.iter().find(|a| a.id == id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.assets.iter().map(|a| a.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

pub fn demo_assets() -> Vec<Asset> {
    vec![
        Asset {
            id: "pp-001".into(),
            name: "District Heat CHP – Budapest".into(),
            location: Some(Location {
                lat: 47.4979,
                lng: 19.0402,
            }),
            status: AssetStatus::Ok,
            sim: SimParams {
                kind: AssetKind::Chp,
                power_base: 2.8,
                power_jitter: 0.25,
                efficiency_base: 44.0,
                efficiency_jitter: 1.5,
                emissions_base: 175.0,
                emissions_jitter: 20.0,
            },
        },
        Asset {
            id: "pp-002".into(),
            name: "Combined Cycle Plant – Vienna".into(),
            location: Some(Location {
                lat: 48.2082,
                lng: 16.3738,
            }),
            status: AssetStatus::Ok,
            sim: SimParams {
                kind: AssetKind::Ccgt,
                power_base: 5.2,
                power_jitter: 0.30,
                efficiency_base: 50.0,
                efficiency_jitter: 2.0,
                emissions_base: 140.0,
                emissions_jitter: 25.0,
            },
        },
        Asset {
            id: "pp-003".into(),
            name: "Peaking Gas Engine – Graz".into(),
            location: Some(Location {
                lat: 47.0707,
                lng: 15.4395,
            }),
            status: AssetStatus::Ok,
            sim: SimParams {
                kind: AssetKind::Peaker,
                power_base: 0.3,
                power_jitter: 0.30,
                efficiency_base: 35.0,
                efficiency_jitter: 2.5,
                emissions_base: 160.0,
                emissions_jitter: 30.0,
            },
        },
    ]
}
