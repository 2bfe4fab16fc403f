use std::sync::Arc;

use fleet_dashboard::{ApiClient, Dashboard, DashboardConfig, Metric};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,fleet_dashboard=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = DashboardConfig::from_env();
    info!("Starting fleet dashboard against {}", config.api_url);

    let client = ApiClient::new(config.api_url.clone(), config.request_timeout)?;
    let dashboard = Dashboard::new(Arc::new(client), config.clone());

    // Populate the asset list before acting on the startup selection
    dashboard.refresh_fleet().await;

    if let Some(wanted) = &config.select_asset {
        let asset = dashboard
            .snapshot()
            .assets
            .into_iter()
            .find(|a| &a.id == wanted);
        match asset {
            Some(asset) => dashboard.select_asset(Some(asset)),
            None => warn!("SELECT_ASSET={} is not a known asset", wanted),
        }
    }
    if config.alarm_live {
        dashboard.set_alarm_live(true);
    }

    dashboard.start();

    let mut summary = interval(config.fleet_interval);
    summary.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = summary.tick() => log_summary(&dashboard),
        }
    }

    dashboard.teardown();
    info!("Dashboard shutdown complete");
    Ok(())
}

fn log_summary(dashboard: &Dashboard) {
    let state = dashboard.snapshot();
    let (alarm, ok) = state.status_counts();
    let top_power: Vec<String> = state
        .top_by_metric(Metric::Power, 3)
        .into_iter()
        .map(|(id, value)| format!("{}={:.2}MW", id, value))
        .collect();

    info!(
        assets = state.assets.len(),
        alarm,
        ok,
        top_power = %top_power.join(", "),
        "Fleet summary"
    );

    if let Some(asset) = &state.selected_asset {
        match state.latest_selected() {
            Some(sample) => info!(
                asset_id = %asset.id,
                samples = state.selected_series.len(),
                power = sample.power,
                efficiency = sample.efficiency,
                emissions = sample.emissions,
                "Selected asset"
            ),
            None => info!(asset_id = %asset.id, "Selected asset has no data yet"),
        }
    }

    if state.alarm_live_mode {
        for (asset_id, alarms) in &state.alarm_detail {
            for alarm in alarms {
                warn!(asset_id = %asset_id, severity = ?alarm.severity, "{}", alarm.message);
            }
        }
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received SIGTERM, shutting down");
        },
    }
}
