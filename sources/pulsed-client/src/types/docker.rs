//! Docker container types

use serde::{Deserialize, Serialize};

/// One container from `GET /api/v1/docker`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerRecord {
    pub id: String,
    pub name: String,
    pub image: String,
    /// Human readable status, e.g. "Up 3 hours"
    pub status: String,
    /// Raw docker state, e.g. "running", "exited"
    pub state: String,
    /// Creation time as a unix timestamp
    pub created: i64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_usage: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_limit: Option<u64>,
}

/// Known docker container states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerState {
    Running,
    Paused,
    Exited,
    Other,
}

impl ContainerRecord {
    pub fn container_state(&self) -> ContainerState {
        match self.state.as_str() {
            "running" => ContainerState::Running,
            "paused" => ContainerState::Paused,
            "exited" => ContainerState::Exited,
            _ => ContainerState::Other,
        }
    }
}

/// Response of `GET /api/v1/docker`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DockerInventory {
    pub containers: Vec<ContainerRecord>,
    pub running: u32,
    pub total: u32,
}

/// Response of `GET /api/v1/docker/{id}/logs`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerLogs {
    pub container: String,
    pub lines: Vec<String>,
}

/// Response of `POST /api/v1/docker/{id}/restart`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestartAck {
    pub status: String,
    pub container: String,
}
