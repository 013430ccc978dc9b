use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

mod config;
mod dbus_interface;
mod engine;

use dbus_interface::{LiveCheckService, BUS_NAME, OBJECT_PATH};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    tracing::info!("livecheckd starting");

    let config = config::Config::from_env().context("invalid liveness thresholds")?;
    tracing::info!(
        front_max_yaw = config.thresholds.front_max_yaw,
        turn_min_yaw = config.thresholds.turn_min_yaw,
        smile_min_probability = config.thresholds.smile_min_probability,
        session_bus = config.session_bus,
        "configuration loaded"
    );

    let verifier = engine::spawn_verifier(config.thresholds, config.queue_depth)?;

    let builder = if config.session_bus {
        zbus::connection::Builder::session()?
    } else {
        zbus::connection::Builder::system()?
    };
    let _conn = builder
        .name(BUS_NAME)?
        .serve_at(OBJECT_PATH, LiveCheckService { verifier })?
        .build()
        .await
        .with_context(|| format!("failed to claim {BUS_NAME}"))?;

    tracing::info!(bus_name = BUS_NAME, path = OBJECT_PATH, "livecheckd ready");

    // Keep running until signaled
    tokio::signal::ctrl_c().await?;
    tracing::info!("livecheckd shutting down");

    Ok(())
}
