//! Tailscale device presence types

use serde::{Deserialize, Serialize};

/// One mesh-network peer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceRecord {
    pub name: String,
    pub ip: String,
    pub online: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_seen: Option<String>,
}

/// Response of `GET /api/v1/tailscale`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DevicePresence {
    pub devices: Vec<DeviceRecord>,
    pub online_count: u32,
}
