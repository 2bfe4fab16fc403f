use serde_json::Value;
use tracing::info;

use crate::error::{AppError, Result};
use crate::models::CommandAck;

pub const MISSING_COMMAND_FIELDS: &str = "asset_id and cmd are required";

/// Acknowledge a control command. Nothing about the asset changes; the
/// status string is the whole protocol.
pub fn submit(asset_id: Option<&str>, verb: Option<&str>, params: Option<&Value>) -> Result<CommandAck> {
    let (asset_id, verb) = match (asset_id, verb) {
        (Some(a), Some(v)) if !a.is_empty() && !v.is_empty() => (a, v),
        _ => return Err(AppError::MissingParameter(MISSING_COMMAND_FIELDS.to_string())),
    };

    let status = match verb {
        "start" => "started",
        "stop" => "stopped",
        "setpoint" => "setpoint updated",
        _ => "ack",
    };

    info!(
        asset_id,
        cmd = verb,
        params = ?params,
        status,
        "Command acknowledged"
    );

    Ok(CommandAck {
        status: status.to_string(),
    })
}
