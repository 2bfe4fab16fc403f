use axum::{
    extract::{Query, State},
    response::Json,
};
use std::collections::HashMap;

use super::{required_asset, AppState};
use crate::alarms::evaluate;
use crate::error::Result;
use crate::models::Alarm;

/// GET /alarms?asset={id}
pub async fn get_alarms(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<Alarm>>> {
    let asset_id = required_asset(&params)?;
    Ok(Json(evaluate(&state.store, asset_id)))
}
