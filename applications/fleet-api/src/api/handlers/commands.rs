use axum::{body::Bytes, response::Json};

use crate::commands::submit;
use crate::error::Result;
use crate::models::{CommandAck, CommandRequest};

/// POST /commands
///
/// The body is read as raw bytes so that a missing, non-JSON or mistyped
/// body still gets the command error response instead of an extractor
/// rejection.
pub async fn create_command(body: Bytes) -> Result<Json<CommandAck>> {
    let request = CommandRequest::from_body(&body);
    let ack = submit(
        request.asset_id.as_deref(),
        request.cmd.as_deref(),
        request.params.as_ref(),
    )?;
    Ok(Json(ack))
}
