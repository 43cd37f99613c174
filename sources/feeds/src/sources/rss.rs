//! RSS/Atom endpoint source
//!
//! Fetches the document directly and scans it, or asks a feed proxy which
//! does the same server-side.

use async_trait::async_trait;

use super::{FeedFetcher, FeedSource};
use crate::error::FeedResult;
use crate::parser::parse_feed;
use crate::types::{FeedItem, FeedResponse};

/// Where the document is fetched from
#[derive(Debug, Clone)]
enum Route {
    Direct,
    /// `GET {proxy}/api/rss?url=...`
    Proxy(String),
}

/// A plain syndication feed
pub struct RssSource {
    id: String,
    url: String,
    route: Route,
    fetcher: FeedFetcher,
}

impl RssSource {
    /// Fetch `url` directly
    pub fn direct(id: &str, url: &str, fetcher: FeedFetcher) -> Self {
        Self {
            id: id.to_string(),
            url: url.to_string(),
            route: Route::Direct,
            fetcher,
        }
    }

    /// Fetch `url` through the feed proxy at `proxy_url`
    pub fn via_proxy(id: &str, url: &str, proxy_url: &str, fetcher: FeedFetcher) -> Self {
        Self {
            id: id.to_string(),
            url: url.to_string(),
            route: Route::Proxy(proxy_url.trim_end_matches('/').to_string()),
            fetcher,
        }
    }

    fn proxy_request_url(proxy: &str, feed_url: &str) -> String {
        let encoded: String = url::form_urlencoded::byte_serialize(feed_url.as_bytes()).collect();
        format!("{}/api/rss?url={}", proxy, encoded)
    }
}

#[async_trait]
impl FeedSource for RssSource {
    fn id(&self) -> &str {
        &self.id
    }

    async fn fetch(&self) -> FeedResult<Vec<FeedItem>> {
        let items = match &self.route {
            Route::Direct => {
                let xml = self.fetcher.fetch_feed_text(&self.url).await?;
                parse_feed(&xml)
            }
            Route::Proxy(proxy) => {
                let request = Self::proxy_request_url(proxy, &self.url);
                self.fetcher.fetch_json::<FeedResponse>(&request).await?.items
            }
        };

        tracing::debug!("Feed {} returned {} items", self.id, items.len());
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FetchConfig;
    use crate::error::FeedError;
    use axum::{http::StatusCode, routing::get, Router};

    async fn spawn(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn fetcher() -> FeedFetcher {
        FeedFetcher::new(&FetchConfig::default()).unwrap()
    }

    #[test]
    fn test_proxy_request_url_encodes_feed() {
        let url = RssSource::proxy_request_url("http://proxy:3001", "https://x.test/feed?a=1&b=2");
        assert_eq!(
            url,
            "http://proxy:3001/api/rss?url=https%3A%2F%2Fx.test%2Ffeed%3Fa%3D1%26b%3D2"
        );
    }

    #[tokio::test]
    async fn test_direct_fetch_parses_document() {
        let router = Router::new().route(
            "/feed.xml",
            get(|| async {
                "<rss><channel><item><title>Hello</title><link>https://x.test/h</link></item></channel></rss>"
            }),
        );
        let base = spawn(router).await;

        let source = RssSource::direct("t", &format!("{}/feed.xml", base), fetcher());
        let items = source.fetch().await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Hello");
    }

    #[tokio::test]
    async fn test_http_error_is_distinct_from_empty() {
        let router = Router::new()
            .route("/empty.xml", get(|| async { "<rss></rss>" }))
            .route("/gone.xml", get(|| async { StatusCode::NOT_FOUND }));
        let base = spawn(router).await;

        let empty = RssSource::direct("e", &format!("{}/empty.xml", base), fetcher());
        assert!(empty.fetch().await.unwrap().is_empty());

        let gone = RssSource::direct("g", &format!("{}/gone.xml", base), fetcher());
        let err = gone.fetch().await.unwrap_err();
        assert!(matches!(err, FeedError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_too_large_rejected() {
        let router = Router::new().route("/big.xml", get(|| async { "x".repeat(2048) }));
        let base = spawn(router).await;

        let small = FeedFetcher::new(&FetchConfig {
            max_response_size: 1024,
            ..FetchConfig::default()
        })
        .unwrap();

        let source = RssSource::direct("b", &format!("{}/big.xml", base), small);
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, FeedError::TooLarge { .. }));
    }
}
