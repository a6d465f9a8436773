use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use common::cache::{MemoryCache, TagCache};
use common::rate_limit::spawn_cleanup_task;
use tracing::info;
use tracing_subscriber::EnvFilter;

use server::config::AppConfig;
use server::contentful::{ClientFactory, SourceProvider};
use server::mail::mailer_from_config;
use server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let provider: Arc<dyn SourceProvider> = Arc::new(ClientFactory::new(config.contentful.clone()));

    let memory = Arc::new(MemoryCache::new());
    let purge = memory.clone();
    let purge_every = Duration::from_secs(config.rate_limit.cleanup_interval_secs);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(purge_every);
        loop {
            interval.tick().await;
            let removed = purge.purge_expired();
            if removed > 0 {
                info!(removed, "Purged expired cache entries");
            }
        }
    });
    let cache: Arc<dyn TagCache> = memory;

    let mailer = mailer_from_config(&config.smtp);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let state = AppState::new(config, provider, cache, mailer);
    let cleanup_every = Duration::from_secs(state.config.rate_limit.cleanup_interval_secs);
    spawn_cleanup_task(state.contact_limiter.clone(), cleanup_every);
    spawn_cleanup_task(state.review_limiter.clone(), cleanup_every);

    let app = server::build_router(state);

    info!("Server running at http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
