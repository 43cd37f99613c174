//! Service health check types

use serde::{Deserialize, Serialize};

/// Result of one HTTP health check run by the agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceCheckResult {
    pub name: String,
    pub url: String,
    /// "healthy", "timeout", "connection_refused" or an agent-specific failure
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<f64>,
    pub last_check: String,
}

/// Classified service status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceStatus {
    Healthy,
    Timeout,
    ConnectionRefused,
    Unhealthy,
}

impl ServiceCheckResult {
    pub fn service_status(&self) -> ServiceStatus {
        match self.status.as_str() {
            "healthy" => ServiceStatus::Healthy,
            "timeout" => ServiceStatus::Timeout,
            "connection_refused" => ServiceStatus::ConnectionRefused,
            _ => ServiceStatus::Unhealthy,
        }
    }
}

/// Response of `GET /api/v1/services`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceHealth {
    pub services: Vec<ServiceCheckResult>,
    pub healthy: u32,
    pub total: u32,
}
