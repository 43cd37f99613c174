//! Feed Proxy Server
//!
//! Serves `GET /api/rss?url=...` for the dashboard.
//!
//! # Configuration
//! Set `FEED_PROXY_PORT` or configure `[feeds.proxy]` in `.skylily.toml`

use feeds::FeedsConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dash_common::init_tracing("feeds", 0)?;

    tracing::info!("Starting feed proxy");

    let config = FeedsConfig::load()?;
    tracing::info!(
        "Cache TTL: {}s, upstream timeout: {}s",
        config.proxy.cache_ttl_seconds,
        config.fetch.timeout_seconds
    );

    feeds::proxy::serve(&config).await?;

    tracing::info!("Feed proxy shutting down");
    Ok(())
}
