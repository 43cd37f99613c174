//! Agent health types

use serde::{Deserialize, Serialize};

/// Response of `GET /health`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentHealth {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}
