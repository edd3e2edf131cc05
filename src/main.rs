use anyhow::{Context, Result};
use iotdash::api::create_app;
use iotdash::config::{load_config, DashboardConfig};
use iotdash::session::SessionManager;
use iotdash::store::DashboardStore;
use iotdash::telemetry::seeded_rng;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "iotdash=info".into()),
        )
        .init();

    info!("IoT dashboard starting...");

    let mut config = match std::env::var("IOTDASH_CONFIG") {
        Ok(path) => {
            info!(path = %path, "Loading configuration");
            load_config(&path)?
        }
        Err(_) => DashboardConfig::default(),
    };
    config.apply_env_overrides();

    info!(
        devices = config.simulation.device_count,
        tick_interval_ms = config.simulation.tick_interval_ms,
        seeded = config.simulation.seed.is_some(),
        "Simulation configured"
    );

    let store = Arc::new(DashboardStore::with_rng(
        config.simulation.clone(),
        seeded_rng(config.simulation.seed),
        config.api.broadcast_capacity,
    ));
    store.start();

    let session = Arc::new(
        SessionManager::open(config.session.storage_path.clone())
            .context("Failed to open session storage")?,
    );

    let app = create_app(Arc::clone(&store), session);

    let listener = tokio::net::TcpListener::bind(&config.api.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.api.bind_address))?;
    info!(address = %config.api.bind_address, "Dashboard API listening");

    let server_handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "Dashboard API server error");
        }
    });

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for ctrl_c signal")?;
    info!("Shutdown signal received");

    server_handle.abort();
    store.stop();

    info!("IoT dashboard stopped");
    Ok(())
}
