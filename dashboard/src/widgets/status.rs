//! Widgets backed by the status agent

use anyhow::Result;
use async_trait::async_trait;
use pulsed_client::{
    DevicePresence, DockerInventory, NetworkReport, ServiceHealth, StatusSource, SystemSnapshot,
};
use std::sync::Arc;

use crate::scheduler::Fetch;

/// Declares a widget that reads one status endpoint
macro_rules! status_widget {
    ($(#[$doc:meta])* $name:ident, $label:literal, $output:ty, $method:ident, $failure:literal) => {
        $(#[$doc])*
        pub struct $name {
            source: Arc<dyn StatusSource>,
        }

        impl $name {
            pub fn new(source: Arc<dyn StatusSource>) -> Self {
                Self { source }
            }
        }

        #[async_trait]
        impl Fetch for $name {
            type Output = $output;

            fn name(&self) -> &str {
                $label
            }

            fn failure_message(&self) -> &str {
                $failure
            }

            async fn fetch(&self) -> Result<$output> {
                Ok(self.source.$method().await?)
            }
        }
    };
}

status_widget!(
    /// CPU, memory, disk and temperatures
    SystemWidget,
    "system",
    SystemSnapshot,
    system_metrics,
    "Pulsed offline"
);

status_widget!(
    /// Container inventory
    DockerWidget,
    "docker",
    DockerInventory,
    docker_containers,
    "Docker unavailable"
);

status_widget!(
    TailscaleWidget,
    "tailscale",
    DevicePresence,
    tailscale_devices,
    "Tailscale unavailable"
);

status_widget!(
    NetworkWidget,
    "network",
    NetworkReport,
    network_interfaces,
    "Network unavailable"
);

status_widget!(
    /// Endpoint checks run by the agent
    ServicesWidget,
    "services",
    ServiceHealth,
    service_checks,
    "Pulsed offline"
);
