//! Serve command.
//!
//! `gatehouse serve` - Start the HTTP gateway.

use crate::server;
use anyhow::Context;
use std::path::Path;
use std::sync::Arc;

/// Start serving until interrupted.
pub async fn run(config_path: &Path, listen: Option<String>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let gatehouse = Arc::new(super::build_gatehouse(&config)?);

    let addr = listen.unwrap_or_else(|| config.listen.clone());
    let app = server::create_router(gatehouse);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!(address = %addr, domain = %config.domain, "gatehouse listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("gatehouse stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
