//! Hacker News source
//!
//! Two-step API: the ranked id list, then one detail request per id. Detail
//! requests run concurrently but results are rejoined in rank order.
//!
//! A detail request that fails, or returns `null` for a deleted item, drops
//! only that story. Failing to fetch the id list fails the whole fetch.
//!
//! See: https://github.com/HackerNews/API

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat};
use futures::stream::{self, StreamExt};
use serde::Deserialize;

use super::{FeedFetcher, FeedSource};
use crate::config::HackerNewsConfig;
use crate::error::FeedResult;
use crate::types::FeedItem;

/// Hacker News top stories
pub struct HackerNewsSource {
    id: String,
    fetcher: FeedFetcher,
    config: HackerNewsConfig,
}

// Hacker News API response types
#[derive(Debug, Deserialize)]
struct HnItem {
    id: u64,
    title: Option<String>,
    url: Option<String>,
    /// Unix seconds
    time: Option<i64>,
    score: Option<u64>,
    descendants: Option<u64>,
}

impl HackerNewsSource {
    pub fn new(id: String, fetcher: FeedFetcher, config: HackerNewsConfig) -> Self {
        Self {
            id,
            fetcher,
            config,
        }
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/v0/{}", self.config.api_url.trim_end_matches('/'), path)
    }

    fn permalink(&self, id: u64) -> String {
        format!("{}{}", self.config.item_url, id)
    }

    async fn fetch_item(&self, id: u64) -> FeedResult<Option<HnItem>> {
        self.fetcher
            .fetch_json(&self.api_url(&format!("item/{}.json", id)))
            .await
    }

    fn to_feed_item(&self, item: HnItem) -> Option<FeedItem> {
        let title = item.title.filter(|t| !t.trim().is_empty())?;
        let permalink = self.permalink(item.id);

        let published_at = item
            .time
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true));

        Some(FeedItem {
            published_at,
            score: item.score,
            comment_count: Some(item.descendants.unwrap_or(0)),
            comments_url: Some(permalink.clone()),
            ..FeedItem::new(
                title,
                item.url.filter(|u| !u.is_empty()).unwrap_or(permalink),
            )
        })
    }
}

#[async_trait]
impl FeedSource for HackerNewsSource {
    fn id(&self) -> &str {
        &self.id
    }

    async fn fetch(&self) -> FeedResult<Vec<FeedItem>> {
        let ids: Vec<u64> = self
            .fetcher
            .fetch_json(&self.api_url("topstories.json"))
            .await?;

        let top: Vec<u64> = ids.into_iter().take(self.config.max_items).collect();

        // `buffered` yields in input order regardless of completion order
        let details: Vec<(u64, FeedResult<Option<HnItem>>)> = stream::iter(top)
            .map(|id| async move { (id, self.fetch_item(id).await) })
            .buffered(self.config.max_concurrency.max(1))
            .collect()
            .await;

        let items: Vec<FeedItem> = details
            .into_iter()
            .filter_map(|(id, result)| match result {
                Ok(Some(item)) => self.to_feed_item(item),
                Ok(None) => {
                    tracing::debug!("Story {} no longer exists", id);
                    None
                }
                Err(e) => {
                    tracing::warn!("Skipping story {}: {}", id, e);
                    None
                }
            })
            .collect();

        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FetchConfig;
    use crate::error::FeedError;
    use axum::{extract::Path, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
    use serde_json::json;
    use std::time::Duration;

    async fn spawn(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn source(api_url: String) -> HackerNewsSource {
        HackerNewsSource::new(
            "hn".into(),
            FeedFetcher::new(&FetchConfig::default()).unwrap(),
            HackerNewsConfig {
                api_url,
                ..HackerNewsConfig::default()
            },
        )
    }

    fn story(id: u64) -> serde_json::Value {
        json!({
            "id": id,
            "title": format!("Story {}", id),
            "url": format!("https://x.test/{}", id),
            "time": 1704067200,
            "score": id * 10,
            "descendants": id
        })
    }

    /// Item handler where story 2 answers first, then 3, then 1
    async fn slow_item(Path(file): Path<String>) -> impl IntoResponse {
        let id: u64 = file.trim_end_matches(".json").parse().unwrap();
        let delay = match id {
            2 => 10,
            3 => 80,
            _ => 160,
        };
        tokio::time::sleep(Duration::from_millis(delay)).await;
        Json(story(id))
    }

    #[tokio::test]
    async fn test_rank_order_not_completion_order() {
        let router = Router::new()
            .route("/v0/topstories.json", get(|| async { Json(json!([3, 1, 2])) }))
            .route("/v0/item/{file}", get(slow_item));
        let base = spawn(router).await;

        let items = source(base).fetch().await.unwrap();
        let titles: Vec<_> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Story 3", "Story 1", "Story 2"]);
    }

    #[tokio::test]
    async fn test_mapping() {
        let router = Router::new()
            .route("/v0/topstories.json", get(|| async { Json(json!([7, 8])) }))
            .route(
                "/v0/item/{file}",
                get(|Path(file): Path<String>| async move {
                    if file == "7.json" {
                        Json(story(7))
                    } else {
                        // Ask HN post: no url, no descendants
                        Json(json!({"id": 8, "title": "Ask HN: x", "time": 0, "score": 1}))
                    }
                }),
            );
        let base = spawn(router).await;

        let items = source(base).fetch().await.unwrap();
        assert_eq!(items.len(), 2);

        assert_eq!(items[0].link, "https://x.test/7");
        assert_eq!(items[0].score, Some(70));
        assert_eq!(items[0].comment_count, Some(7));
        assert_eq!(
            items[0].published_at.as_deref(),
            Some("2024-01-01T00:00:00.000Z")
        );
        assert_eq!(
            items[0].comments_url.as_deref(),
            Some("https://news.ycombinator.com/item?id=7")
        );

        assert_eq!(items[1].link, "https://news.ycombinator.com/item?id=8");
        assert_eq!(items[1].comment_count, Some(0));
    }

    #[tokio::test]
    async fn test_takes_first_fifteen() {
        let router = Router::new()
            .route(
                "/v0/topstories.json",
                get(|| async { Json((1..=40).collect::<Vec<u64>>()) }),
            )
            .route(
                "/v0/item/{file}",
                get(|Path(file): Path<String>| async move {
                    Json(story(file.trim_end_matches(".json").parse().unwrap()))
                }),
            );
        let base = spawn(router).await;

        let items = source(base).fetch().await.unwrap();
        assert_eq!(items.len(), 15);
        assert_eq!(items[14].title, "Story 15");
    }

    #[tokio::test]
    async fn test_failed_detail_omits_only_that_item() {
        let router = Router::new()
            .route("/v0/topstories.json", get(|| async { Json(json!([1, 2, 3, 4])) }))
            .route(
                "/v0/item/{file}",
                get(|Path(file): Path<String>| async move {
                    match file.as_str() {
                        "2.json" => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
                        "4.json" => Json(serde_json::Value::Null).into_response(),
                        other => {
                            Json(story(other.trim_end_matches(".json").parse().unwrap()))
                                .into_response()
                        }
                    }
                }),
            );
        let base = spawn(router).await;

        let items = source(base).fetch().await.unwrap();
        let titles: Vec<_> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Story 1", "Story 3"]);
    }

    #[tokio::test]
    async fn test_id_list_failure_fails_fetch() {
        let router = Router::new().route(
            "/v0/topstories.json",
            get(|| async { StatusCode::BAD_GATEWAY }),
        );
        let base = spawn(router).await;

        let err = source(base).fetch().await.unwrap_err();
        assert!(matches!(err, FeedError::Status { status: 502, .. }));
    }
}
