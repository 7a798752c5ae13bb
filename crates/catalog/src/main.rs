//! Play Catalog - service entry point

use std::sync::Arc;

use anyhow::Context;
use play_catalog::{router, AppContext};
use play_common::observability::{init_tracing, LogFormat};
use play_domain::constants::{CATALOG_SERVICE_NAME, DEFAULT_CATALOG_BIND_ADDR};
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = dotenvy::dotenv();

    init_tracing(LogFormat::from_env()?)?;
    match dotenv {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(e) => warn!("could not load .env file: {e}"),
    }

    let config = play_infra::config::load(CATALOG_SERVICE_NAME, DEFAULT_CATALOG_BIND_ADDR)
        .context("failed to load configuration")?;
    let bind_addr = config.service.bind_addr.clone();

    let ctx = Arc::new(AppContext::new(config).await.context("failed to build catalog context")?);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    info!(addr = %bind_addr, store = ctx.store.kind(), "catalog service listening");

    axum::serve(listener, router(ctx)).with_graceful_shutdown(shutdown_signal()).await?;

    info!("catalog service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}
