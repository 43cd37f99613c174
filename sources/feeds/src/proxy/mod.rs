//! Feed proxy server
//!
//! Fetches a feed server-side, scans it and returns normalized items. This
//! keeps browsers out of cross-origin trouble and lets several dashboards
//! share one short-lived cache.
//!
//! Routes:
//! - `GET /api/rss?url=<feed>` → `{"items": [...]}`, 400 without `url`, 500 on fetch failure
//! - `GET /health`

pub mod cache;

use anyhow::Result;
use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use crate::config::FeedsConfig;
use crate::parser::parse_feed;
use crate::sources::FeedFetcher;
use crate::types::FeedResponse;
use cache::{CacheStats, FeedCache};

/// Shared proxy state
#[derive(Clone)]
pub struct ProxyState {
    fetcher: FeedFetcher,
    cache: Arc<FeedCache>,
    cache_ttl: Duration,
}

impl ProxyState {
    pub fn new(config: &FeedsConfig) -> Result<Self> {
        let cache_ttl = Duration::from_secs(config.proxy.cache_ttl_seconds);
        Ok(Self {
            fetcher: FeedFetcher::new(&config.fetch)?,
            cache: Arc::new(FeedCache::new(cache_ttl)),
            cache_ttl,
        })
    }
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    fn new(msg: impl Into<String>) -> Self {
        Self { error: msg.into() }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub cache: CacheStats,
}

/// `url` query parameter
#[derive(Debug, Deserialize)]
pub struct RssQuery {
    pub url: Option<String>,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

/// Build the proxy router
pub fn router(state: ProxyState) -> Router {
    Router::new()
        .route("/api/rss", get(rss_handler))
        .route("/health", get(health_check))
        .with_state(state)
}

/// Start the proxy server
pub async fn serve(config: &FeedsConfig) -> Result<()> {
    let state = ProxyState::new(config)?;
    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", config.proxy.bind, config.proxy.port).parse()?;
    tracing::info!("Starting feed proxy on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Fetch and scan one feed
pub async fn rss_handler(
    State(state): State<ProxyState>,
    Query(query): Query<RssQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let url = query
        .url
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or_else(|| {
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new("URL parameter required")),
            )
        })?;

    let cache_control = format!("public, max-age={}", state.cache_ttl.as_secs());

    let items = match state.cache.get(url) {
        Some(items) => {
            tracing::debug!("Serving {} from cache", url);
            items
        }
        None => {
            let xml = state.fetcher.fetch_feed_text(url).await.map_err(|e| {
                tracing::error!("RSS fetch error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::new("Failed to fetch feed")),
                )
            })?;

            let items = Arc::new(parse_feed(&xml));
            tracing::info!("Fetched {} items from {}", items.len(), url);
            state.cache.insert(url, items.clone());
            items
        }
    };

    Ok((
        [(header::CACHE_CONTROL, cache_control)],
        Json(FeedResponse {
            items: items.as_ref().clone(),
        }),
    ))
}

/// Health check endpoint
pub async fn health_check(State(state): State<ProxyState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        cache: state.cache.stats(),
    })
}
