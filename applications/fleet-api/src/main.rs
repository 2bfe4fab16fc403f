use std::path::Path;
use std::sync::Arc;

use fleet_api::api::{create_router, AppState};
use fleet_api::generator::{GeneratorConfig, TelemetryGenerator};
use fleet_api::{Config, TelemetryStore};
use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,fleet_api=debug"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    info!("Starting fleet-api");

    let cfg_path = std::env::var("APP_CONFIG").unwrap_or_else(|_| "config/config.yaml".into());
    let cfg = if Path::new(&cfg_path).exists() {
        let cfg = Config::load(&cfg_path)?;
        info!("Configuration loaded from {}", cfg_path);
        cfg
    } else {
        info!("No configuration at {}, using defaults", cfg_path);
        Config::from_yaml("{}")?
    };

    let registry = Arc::new(cfg.registry()?);
    let store = Arc::new(TelemetryStore::new(
        registry.ids(),
        cfg.simulation.window_capacity,
    ));
    info!(
        "Registry loaded with {} assets (window capacity {})",
        registry.len(),
        store.capacity()
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let generator = TelemetryGenerator::new(
        registry.clone(),
        store.clone(),
        GeneratorConfig {
            tick_ms: cfg.simulation.tick_ms,
        },
    );
    let generator_handle = tokio::spawn(async move {
        generator.run(shutdown_rx).await;
    });

    let router = create_router(AppState::new(registry, store));
    let addr = cfg.bind_address();

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", addr, e))?;

    info!("API server listening on {}", addr);

    if let Err(e) = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "API server error");
    }

    let _ = shutdown_tx.send(true);
    if let Err(e) = generator_handle.await {
        tracing::error!(error = %e, "Telemetry generator task failed");
    }

    info!("Application shutdown complete");
    Ok(())
}

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
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
