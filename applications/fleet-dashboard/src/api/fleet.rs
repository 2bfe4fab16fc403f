use async_trait::async_trait;
use serde_json::Value;

use super::client::{ApiClient, ApiError};
use super::FleetApi;
use crate::models::{Alarm, Asset, CommandAck, CommandRequest, TelemetrySeries};

const USER_NAME: &str = "dashboard";

#[async_trait]
impl FleetApi for ApiClient {
    async fn get_assets(&self) -> Result<Vec<Asset>, ApiError> {
        self.get("/assets", &[]).await
    }

    async fn get_telemetry(&self, asset_id: &str, limit: u32) -> Result<TelemetrySeries, ApiError> {
        self.get(
            "/telemetry",
            &[("asset", asset_id.to_string()), ("limit", limit.to_string())],
        )
        .await
    }

    async fn get_alarms(&self, asset_id: &str) -> Result<Vec<Alarm>, ApiError> {
        self.get("/alarms", &[("asset", asset_id.to_string())]).await
    }

    async fn send_command(
        &self,
        asset_id: &str,
        cmd: &str,
        params: Value,
    ) -> Result<CommandAck, ApiError> {
        let body = CommandRequest {
            user_name: USER_NAME,
            asset_id,
            cmd,
            params,
        };
        self.post("/commands", &body).await
    }
}
