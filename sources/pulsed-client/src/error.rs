//! Error types for pulsed agent calls

use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur when calling the pulsed agent
///
/// Cloneable so that one failed upstream request can be reported to every
/// caller sharing it.
#[derive(Error, Debug, Clone)]
pub enum PulsedError {
    /// The configured base URL could not be parsed or cannot carry paths
    #[error("invalid pulsed base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// Network-level failure: DNS, connection refused, reset, timeout
    #[error("pulsed unreachable at {url}: {source}")]
    Unreachable {
        url: String,
        #[source]
        source: Arc<reqwest::Error>,
    },

    /// The agent answered with a non-success status
    #[error("Pulsed API error: {status}")]
    Status {
        /// HTTP status code
        status: u16,
        /// First part of the response body, for logs
        body: String,
    },

    /// The agent answered with a body that does not match the endpoint schema
    #[error("failed to decode pulsed response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: Arc<serde_json::Error>,
    },
}

impl PulsedError {
    /// HTTP status code, when the agent answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the display layer should show a generic "unavailable" state.
    ///
    /// Transport failures and error statuses collapse into the same display;
    /// only a decode failure points at a contract mismatch.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unreachable { .. } | Self::Status { .. })
    }
}

/// Result type alias for pulsed calls
pub type PulsedResult<T> = Result<T, PulsedError>;
