pub mod alarms;
pub mod assets;
pub mod commands;
pub mod health;
pub mod reports;
pub mod telemetry;

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::registry::AssetRegistry;
use crate::store::TelemetryStore;

pub const ASSET_REQUIRED: &str = "asset is required";

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<AssetRegistry>,
    pub store: Arc<TelemetryStore>,
}

impl AppState {
    pub fn new(registry: Arc<AssetRegistry>, store: Arc<TelemetryStore>) -> Self {
        Self { registry, store }
    }
}

/// The `asset` query parameter, rejecting absent or empty values.
fn required_asset(params: &HashMap<String, String>) -> Result<&str> {
    params
        .get("asset")
        .map(String::as_str)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::MissingParameter(ASSET_REQUIRED.to_string()))
}
