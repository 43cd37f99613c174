//! Feed sources
//!
//! This module provides a trait-based abstraction over fetch strategies.
//! Plain RSS/Atom endpoints and the Hacker News JSON API both produce
//! normalized [`FeedItem`] lists.

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::config::{FeedsConfig, FetchConfig, HackerNewsConfig};
use crate::error::{FeedError, FeedResult};
use crate::registry::{FeedSourceDescriptor, FetchStrategy};
use crate::types::FeedItem;

pub mod hackernews;
pub mod rss;

pub use hackernews::HackerNewsSource;
pub use rss::RssSource;

/// MIME types offered when fetching syndication documents
pub const FEED_ACCEPT: &str =
    "application/rss+xml, application/xml, text/xml, application/atom+xml";

/// Trait for feed sources
///
/// A source fetches its upstream and returns items in source order.
/// Transport failures are errors; an unparseable document is an empty list.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Feed identifier this source was built for
    fn id(&self) -> &str;

    /// Fetch and normalize the current items
    async fn fetch(&self) -> FeedResult<Vec<FeedItem>>;
}

/// HTTP fetch service shared by all sources
#[derive(Clone)]
pub struct FeedFetcher {
    client: Client,
    config: FetchConfig,
}

impl FeedFetcher {
    /// Create a FeedFetcher with the given configuration
    pub fn new(config: &FetchConfig) -> FeedResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(&config.user_agent)
            .build()
            .map_err(FeedError::Client)?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Fetch a syndication document as text
    pub async fn fetch_feed_text(&self, url: &str) -> FeedResult<String> {
        self.fetch_text(url, FEED_ACCEPT).await
    }

    /// Fetch a URL and decode the body as JSON
    pub async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> FeedResult<T> {
        let body = self.fetch_text(url, "application/json").await?;
        serde_json::from_str(&body).map_err(|source| FeedError::Decode {
            url: url.to_string(),
            source,
        })
    }

    async fn fetch_text(&self, url: &str, accept: &str) -> FeedResult<String> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .header(header::ACCEPT, accept)
            .send()
            .await
            .map_err(|e| FeedError::http(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        // Check Content-Length before downloading
        let max = self.config.max_response_size;
        if let Some(len) = response.content_length() {
            if len as usize > max {
                return Err(FeedError::TooLarge {
                    url: url.to_string(),
                    size: len as usize,
                    max,
                });
            }
        }

        let content = response.text().await.map_err(|e| FeedError::http(url, e))?;
        if content.len() > max {
            return Err(FeedError::TooLarge {
                url: url.to_string(),
                size: content.len(),
                max,
            });
        }

        Ok(content)
    }
}

/// Everything needed to turn a descriptor into a live source
#[derive(Clone)]
pub struct FeedContext {
    pub fetcher: FeedFetcher,
    pub hackernews: HackerNewsConfig,
    /// When set, RSS feeds go through this feed proxy instead of directly
    pub proxy_url: Option<String>,
}

impl FeedContext {
    pub fn new(config: &FeedsConfig) -> FeedResult<Self> {
        Ok(Self {
            fetcher: FeedFetcher::new(&config.fetch)?,
            hackernews: config.hackernews.clone(),
            proxy_url: None,
        })
    }

    /// Route RSS fetches through a feed proxy
    pub fn with_proxy(mut self, proxy_url: impl Into<String>) -> Self {
        self.proxy_url = Some(proxy_url.into());
        self
    }

    /// Build the fetch strategy for a descriptor
    pub fn source_for(&self, feed: &FeedSourceDescriptor) -> FeedResult<Box<dyn FeedSource>> {
        match feed.fetch_strategy {
            FetchStrategy::SocialJson => Ok(Box::new(HackerNewsSource::new(
                feed.id.clone(),
                self.fetcher.clone(),
                self.hackernews.clone(),
            ))),
            FetchStrategy::RssXml => {
                let url = feed
                    .endpoint_url
                    .as_deref()
                    .filter(|u| !u.trim().is_empty())
                    .ok_or_else(|| FeedError::InvalidSource {
                        id: feed.id.clone(),
                        reason: "RSS feed has no URL".to_string(),
                    })?;

                let source = match &self.proxy_url {
                    Some(proxy) => RssSource::via_proxy(&feed.id, url, proxy, self.fetcher.clone()),
                    None => RssSource::direct(&feed.id, url, self.fetcher.clone()),
                };
                Ok(Box::new(source))
            }
        }
    }
}
