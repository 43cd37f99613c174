//! Normalized feed item
//!
//! Every upstream format maps onto [`FeedItem`]. The JSON field names match
//! what the feed proxy has always returned to the dashboard.

use serde::{Deserialize, Serialize};

/// Number of items a feed widget displays
pub const MAX_FEED_ITEMS: usize = 15;

/// Maximum summary length in characters
pub const SUMMARY_MAX_CHARS: usize = 200;

/// One syndicated entry, regardless of source format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedItem {
    /// Tag-stripped, non-empty title
    pub title: String,
    /// Absolute link to the content
    pub link: String,
    /// Source-native date string or RFC 3339 timestamp
    #[serde(rename = "pubDate", default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    /// Tag-stripped description, at most 200 characters
    #[serde(rename = "description", default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Upvotes, social-news only
    #[serde(rename = "points", default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u64>,
    /// Comment count, social-news only
    #[serde(rename = "comments", default, skip_serializing_if = "Option::is_none")]
    pub comment_count: Option<u64>,
    #[serde(rename = "commentsUrl", default, skip_serializing_if = "Option::is_none")]
    pub comments_url: Option<String>,
}

impl FeedItem {
    /// Item with only the required fields set
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            published_at: None,
            summary: None,
            score: None,
            comment_count: None,
            comments_url: None,
        }
    }
}

/// Body returned by the feed proxy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedResponse {
    pub items: Vec<FeedItem>,
}
