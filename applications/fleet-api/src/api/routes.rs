use crate::api::handlers::{alarms, assets, commands, health, reports, telemetry, AppState};
use axum::{
    extract::Request,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing::Level;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/assets", get(assets::list_assets))
        .route("/telemetry", get(telemetry::get_telemetry))
        .route("/alarms", get(alarms::get_alarms))
        .route("/commands", post(commands::create_command))
        .route("/reports", get(reports::get_monthly_report))
        .route("/reports/export", get(reports::export_monthly_report))
        .with_state(state)
        .layer(tower_http::cors::CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request| {
                    tracing::span!(
                        Level::INFO,
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                    )
                })
                .on_request(|_request: &Request, _span: &tracing::Span| {
                    tracing::event!(Level::DEBUG, "received request");
                })
                .on_response(
                    |response: &axum::response::Response,
                     latency: std::time::Duration,
                     _span: &tracing::Span| {
                        tracing::event!(
                            Level::DEBUG,
                            status = response.status().as_u16(),
                            latency = ?latency,
                            "request completed"
                        );
                    },
                ),
        )
}
