use axum::{extract::State, response::Json};

use super::AppState;
use crate::models::Asset;

/// GET /assets
pub async fn list_assets(State(state): State<AppState>) -> Json<Vec<Asset>> {
    Json(state.registry.all().to_vec())
}
