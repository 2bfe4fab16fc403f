// Integration tests for the HTTP surface.
// The router is built over an in-memory store that the tests fill directly.

use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use chrono::{Duration, TimeZone, Utc};
use fleet_api::api::{create_router, AppState};
use fleet_api::models::TelemetrySample;
use fleet_api::{AssetRegistry, TelemetryStore};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn sample(second: i64, efficiency: f64, emissions: f64) -> TelemetrySample {
    TelemetrySample {
        timestamp: Utc.with_ymd_and_hms(2025, 8, 14, 10, 0, 0).unwrap() + Duration::seconds(second),
        power: 2.5,
        efficiency,
        emissions,
    }
}

fn create_test_server() -> (TestServer, Arc<TelemetryStore>) {
    let registry = Arc::new(AssetRegistry::demo());
    let store = Arc::new(TelemetryStore::new(registry.ids(), 500));
    let app = create_router(AppState::new(registry, store.clone()));
    (TestServer::new(app).unwrap(), store)
}

#[tokio::test]
async fn test_health_endpoint() {
    let (server, _) = create_test_server();

    let response = server.get("/health").await;
    response.assert_status(StatusCode::OK);
    response.assert_json(&json!({ "ok": true }));
}

#[tokio::test]
async fn test_assets_endpoint() {
    let (server, _) = create_test_server();

    let response = server.get("/assets").await;
    response.assert_status(StatusCode::OK);

    let body: Vec<Value> = response.json();
    assert_eq!(body.len(), 3);
    assert_eq!(body[0]["id"], "pp-001");
    assert_eq!(body[0]["status"], "OK");
    assert!(body[0]["lat"].is_number());
    assert!(body[0].get("sim").is_none());
}

#[tokio::test]
async fn test_telemetry_requires_asset() {
    let (server, _) = create_test_server();

    let response = server.get("/telemetry").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({ "error": "asset is required" }));

    let response = server.get("/telemetry").add_query_param("asset", "").await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_telemetry_returns_chronological_tail() {
    let (server, store) = create_test_server();
    for i in 0..10 {
        store.append("pp-001", sample(i, 44.0, 150.0));
    }

    let response = server
        .get("/telemetry")
        .add_query_param("asset", "pp-001")
        .add_query_param("limit", 3)
        .await;
    response.assert_status(StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["assetId"], "pp-001");
    let series = body["series"].as_array().unwrap();
    assert_eq!(series.len(), 3);
    assert_eq!(series[0]["ts"], "2025-08-14T10:00:07Z");
    assert_eq!(series[2]["ts"], "2025-08-14T10:00:09Z");
    assert_eq!(series[2]["moisture"], 2.5);
    assert_eq!(series[2]["health"], 44.0);
    assert_eq!(series[2]["co2"], 150.0);
}

#[tokio::test]
async fn test_telemetry_limit_is_clamped_and_defaulted() {
    let (server, store) = create_test_server();
    for i in 0..250 {
        store.append("pp-002", sample(i, 44.0, 150.0));
    }

    let series_len = |body: Value| body["series"].as_array().unwrap().len();

    let response = server.get("/telemetry").add_query_param("asset", "pp-002").await;
    assert_eq!(series_len(response.json()), 200);

    let response = server
        .get("/telemetry")
        .add_query_param("asset", "pp-002")
        .add_query_param("limit", -5)
        .await;
    assert_eq!(series_len(response.json()), 1);

    let response = server
        .get("/telemetry")
        .add_query_param("asset", "pp-002")
        .add_query_param("limit", 50_000)
        .await;
    assert_eq!(series_len(response.json()), 250);

    let response = server
        .get("/telemetry")
        .add_query_param("asset", "pp-002")
        .add_query_param("limit", "abc")
        .await;
    assert_eq!(series_len(response.json()), 200);

    let response = server
        .get("/telemetry")
        .add_query_param("asset", "pp-002")
        .add_query_param("limit", "5abc")
        .await;
    assert_eq!(series_len(response.json()), 5);

    let response = server
        .get("/telemetry")
        .add_query_param("asset", "pp-002")
        .add_query_param("limit", "2.7")
        .await;
    assert_eq!(series_len(response.json()), 2);
}

#[tokio::test]
async fn test_telemetry_unknown_asset_is_empty() {
    let (server, _) = create_test_server();

    let response = server
        .get("/telemetry")
        .add_query_param("asset", "unknown-asset")
        .add_query_param("limit", 10)
        .await;
    response.assert_status(StatusCode::OK);
    response.assert_json(&json!({ "assetId": "unknown-asset", "series": [] }));
}

#[tokio::test]
async fn test_alarms_endpoint() {
    let (server, store) = create_test_server();

    let response = server.get("/alarms").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({ "error": "asset is required" }));

    let response = server.get("/alarms").add_query_param("asset", "pp-001").await;
    response.assert_status(StatusCode::OK);
    response.assert_json(&json!([]));

    store.append("pp-001", sample(0, 39.0, 185.0));
    let response = server.get("/alarms").add_query_param("asset", "pp-001").await;
    let body: Vec<Value> = response.json();
    assert_eq!(body.len(), 2);
    assert_eq!(body[0]["type"], "EMISSIONS_HIGH");
    assert_eq!(body[0]["severity"], "MEDIUM");
    assert_eq!(body[1]["type"], "EFFICIENCY_LOW");
    assert_eq!(body[1]["severity"], "LOW");
    assert_eq!(body[0]["ts"], "2025-08-14T10:00:00Z");
}

#[tokio::test]
async fn test_commands_endpoint() {
    let (server, _) = create_test_server();

    for (cmd, status) in [
        ("start", "started"),
        ("stop", "stopped"),
        ("setpoint", "setpoint updated"),
        ("purge", "ack"),
    ] {
        let response = server
            .post("/commands")
            .json(&json!({
                "user_name": "tester",
                "asset_id": "pp-001",
                "cmd": cmd,
                "params": { "value": 80 }
            }))
            .await;
        response.assert_status(StatusCode::OK);
        response.assert_json(&json!({ "status": status }));
    }
}

#[tokio::test]
async fn test_commands_missing_fields() {
    let (server, _) = create_test_server();

    let response = server
        .post("/commands")
        .json(&json!({ "asset_id": "pp-001" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({ "error": "asset_id and cmd are required" }));

    let response = server.post("/commands").json(&json!({ "cmd": "start" })).await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_commands_unreadable_body() {
    let (server, _) = create_test_server();
    let expected = json!({ "error": "asset_id and cmd are required" });

    let response = server.post("/commands").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&expected);

    let response = server.post("/commands").text("cmd=start").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&expected);

    let response = server
        .post("/commands")
        .json(&json!({ "asset_id": 1, "cmd": "start" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&expected);
}

#[tokio::test]
async fn test_monthly_report() {
    let (server, _) = create_test_server();

    let response = server.get("/reports").add_query_param("period", "2025-08").await;
    response.assert_status(StatusCode::OK);

    let body: Vec<Value> = response.json();
    assert_eq!(body.len(), 3);
    assert_eq!(body[0]["assetId"], "pp-001");
    assert_eq!(body[0]["energyMWh"], 867);
    assert_eq!(body[0]["avgEfficiencyPct"], 38.1);
    assert_eq!(body[0]["emissions95th"], 176);
}

#[tokio::test]
async fn test_report_export_is_csv_download() {
    let (server, _) = create_test_server();

    let response = server
        .get("/reports/export")
        .add_query_param("period", "2025-08")
        .await;
    response.assert_status(StatusCode::OK);
    assert_eq!(
        response.header("content-disposition"),
        "attachment; filename=\"monthly_report_2025-08.csv\""
    );

    let text = response.text();
    assert!(text.starts_with('\u{feff}'));
    assert!(text.contains("Plant,Energy (MWh),Avg Eff (%),NOx 95th (ppm)"));
    assert_eq!(text.lines().count(), 4);
}
