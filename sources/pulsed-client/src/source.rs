//! Trait seam over the agent client
//!
//! Widgets depend on [`StatusSource`] rather than on [`PulsedClient`] so
//! they can be driven by a fake in tests.

use async_trait::async_trait;

use crate::client::PulsedClient;
use crate::error::PulsedResult;
use crate::types::{
    AgentHealth, ContainerLogs, DevicePresence, DockerInventory, NetworkReport, RestartAck,
    ServiceHealth, SystemSnapshot,
};

/// Read and control access to a status agent
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn health(&self) -> PulsedResult<AgentHealth>;

    async fn system_metrics(&self) -> PulsedResult<SystemSnapshot>;

    async fn docker_containers(&self) -> PulsedResult<DockerInventory>;

    async fn docker_logs(&self, container_id: &str, lines: u32) -> PulsedResult<ContainerLogs>;

    /// Has a side effect on the remote host
    async fn docker_restart(&self, container_id: &str) -> PulsedResult<RestartAck>;

    async fn tailscale_devices(&self) -> PulsedResult<DevicePresence>;

    async fn network_interfaces(&self) -> PulsedResult<NetworkReport>;

    async fn service_checks(&self) -> PulsedResult<ServiceHealth>;
}

#[async_trait]
impl StatusSource for PulsedClient {
    async fn health(&self) -> PulsedResult<AgentHealth> {
        PulsedClient::health(self).await
    }

    async fn system_metrics(&self) -> PulsedResult<SystemSnapshot> {
        PulsedClient::system_metrics(self).await
    }

    async fn docker_containers(&self) -> PulsedResult<DockerInventory> {
        PulsedClient::docker_containers(self).await
    }

    async fn docker_logs(&self, container_id: &str, lines: u32) -> PulsedResult<ContainerLogs> {
        PulsedClient::docker_logs(self, container_id, lines).await
    }

    async fn docker_restart(&self, container_id: &str) -> PulsedResult<RestartAck> {
        PulsedClient::docker_restart(self, container_id).await
    }

    async fn tailscale_devices(&self) -> PulsedResult<DevicePresence> {
        PulsedClient::tailscale_devices(self).await
    }

    async fn network_interfaces(&self) -> PulsedResult<NetworkReport> {
        PulsedClient::network_interfaces(self).await
    }

    async fn service_checks(&self) -> PulsedResult<ServiceHealth> {
        PulsedClient::service_checks(self).await
    }
}
