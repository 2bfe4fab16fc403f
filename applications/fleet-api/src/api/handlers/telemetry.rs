use axum::{
    extract::{Query, State},
    response::Json,
};
use std::collections::HashMap;

use super::{required_asset, AppState};
use crate::error::Result;
use crate::models::TelemetryResponse;
use crate::store::DEFAULT_QUERY_LIMIT;

/// Leading integer of `raw`, the way browsers' `parseInt` reads it:
/// optional whitespace and sign, then digits; anything after is ignored.
/// Values too large for `i64` saturate.
fn leading_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let value = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -value } else { value })
}

/// GET /telemetry?asset={id}&limit={n}
///
/// `limit` takes its leading integer; a value without one, or zero, falls
/// back to the default, and the result is clamped by the store.
pub async fn get_telemetry(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<TelemetryResponse>> {
    let asset_id = required_asset(&params)?;
    let limit = params
        .get("limit")
        .and_then(|s| leading_int(s))
        .filter(|n| *n != 0)
        .unwrap_or(DEFAULT_QUERY_LIMIT as i64);

    let series = state.store.query(asset_id, limit);

    Ok(Json(TelemetryResponse {
        asset_id: asset_id.to_string(),
        series,
    }))
}
