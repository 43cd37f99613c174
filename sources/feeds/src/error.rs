//! Error types for feed fetching
//!
//! A malformed payload is never an error: the scanner just yields fewer
//! items. These errors cover the transport and the JSON APIs.

use thiserror::Error;

/// Errors that can occur while fetching a feed
#[derive(Error, Debug)]
pub enum FeedError {
    /// Network-level failure reaching the feed
    #[error("failed to fetch feed {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The upstream answered with a non-success status
    #[error("failed to fetch feed {url}: HTTP {status}")]
    Status { url: String, status: u16 },

    /// The upstream body exceeded the configured size limit
    #[error("feed {url} too large: {size} bytes (max: {max} bytes)")]
    TooLarge { url: String, size: usize, max: usize },

    /// A JSON API returned an unexpected shape
    #[error("failed to decode {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// The HTTP client could not be constructed
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The feed descriptor cannot be fetched as configured
    #[error("invalid feed source '{id}': {reason}")]
    InvalidSource { id: String, reason: String },
}

impl FeedError {
    pub(crate) fn http(url: &str, source: reqwest::Error) -> Self {
        Self::Http {
            url: url.to_string(),
            source,
        }
    }
}

/// Result type alias for feed operations
pub type FeedResult<T> = Result<T, FeedError>;
