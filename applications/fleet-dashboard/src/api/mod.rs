pub mod client;
pub mod fleet;

use async_trait::async_trait;
use serde_json::Value;

pub use client::{ApiClient, ApiError};

use crate::models::{Alarm, Asset, CommandAck, TelemetrySeries};

/// The fleet service as seen by the dashboard.
///
/// Every polling cycle goes through this trait, so the reconciliation core
/// can be driven by any transport.
#[async_trait]
pub trait FleetApi: Send + Sync {
    async fn get_assets(&self) -> Result<Vec<Asset>, ApiError>;

    async fn get_telemetry(&self, asset_id: &str, limit: u32) -> Result<TelemetrySeries, ApiError>;

    async fn get_alarms(&self, asset_id: &str) -> Result<Vec<Alarm>, ApiError>;

    async fn send_command(
        &self,
        asset_id: &str,
        cmd: &str,
        params: Value,
    ) -> Result<CommandAck, ApiError>;
}
