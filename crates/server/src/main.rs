use std::time::Duration;

use anyhow::{Context, Result};
use presente_core::config::{AppConfig, LoadOptions};
use presente_server::{bootstrap_with_config, logging::init_logging, router};
use tokio::sync::watch;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Logging comes up before bootstrap so its events are visible.
    let config = AppConfig::load(LoadOptions::default())?;
    init_logging(&config);

    let app = bootstrap_with_config(config).await?;
    let address = format!("{}:{}", app.config.server.bind_address, app.config.server.port);
    let grace = Duration::from_secs(app.config.server.graceful_shutdown_secs);

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    info!(
        event_name = "system.server.started",
        correlation_id = "bootstrap",
        bind_address = %address,
        "presente-server listening"
    );

    let (stop_tx, mut stop_rx) = watch::channel(false);
    let server = axum::serve(listener, router(app.state)).with_graceful_shutdown(async move {
        let _ = stop_rx.changed().await;
    });
    let mut serving = tokio::spawn(async move { server.await });

    tokio::select! {
        finished = &mut serving => {
            finished.context("server task panicked")??;
            return Ok(());
        }
        signal = tokio::signal::ctrl_c() => signal?,
    }

    info!(
        event_name = "system.server.stopping",
        correlation_id = "shutdown",
        grace_secs = grace.as_secs(),
        "draining in-flight requests"
    );
    let _ = stop_tx.send(true);

    match tokio::time::timeout(grace, serving).await {
        Ok(finished) => finished.context("server task panicked")??,
        Err(_) => warn!(
            event_name = "system.server.shutdown_timeout",
            correlation_id = "shutdown",
            "grace period elapsed with requests still open"
        ),
    }
    Ok(())
}
