use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Json},
};
use chrono::Utc;
use std::collections::HashMap;

use super::AppState;
use crate::error::Result;
use crate::models::ReportRow;
use crate::reports::{export_filename, monthly_report, period_key, to_csv};

fn period_from(params: &HashMap<String, String>) -> String {
    params
        .get("period")
        .filter(|p| !p.is_empty())
        .cloned()
        .unwrap_or_else(|| period_key(Utc::now()))
}

/// GET /reports?period=YYYY-MM
pub async fn get_monthly_report(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Vec<ReportRow>> {
    let period = period_from(&params);
    Json(monthly_report(&state.registry, &period))
}

/// GET /reports/export?period=YYYY-MM
pub async fn export_monthly_report(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse> {
    let period = period_from(&params);
    let body = to_csv(&monthly_report(&state.registry, &period))?;
    let disposition = format!("attachment; filename=\"{}\"", export_filename(&period));

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    ))
}
