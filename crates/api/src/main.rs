//! LeadForge service entry point.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use leadforge_api::{router, AppContext};
use leadforge_infra::{SchedulerConfig, SyncScheduler};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    leadforge_api::logging::init();

    let config = leadforge_infra::config::load().context("loading configuration")?;
    let ctx = AppContext::from_config(&config).context("wiring application components")?;

    // The scheduler owns its background task; keep it alive for the whole
    // process so Drop does not cancel it.
    let mut scheduler = SyncScheduler::new(
        Arc::clone(&ctx.service),
        SchedulerConfig { interval: Duration::from_secs(config.sync.interval_seconds) },
    );
    if config.sync.enabled {
        scheduler.start().await.context("starting sync scheduler")?;
    } else {
        info!("scheduled sync disabled by configuration");
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener =
        tokio::net::TcpListener::bind(&addr).await.with_context(|| format!("binding {addr}"))?;
    info!(%addr, "LeadForge API listening");

    axum::serve(listener, router(ctx)).await.context("serving HTTP")?;

    Ok(())
}
