//! Dashboard widgets
//!
//! Each widget is a [`Fetch`] implementation; the scheduler owns timing and
//! state. Status widgets read the pulsed agent, the rest read feeds and the
//! weather API.

mod status;

pub use status::{DockerWidget, NetworkWidget, ServicesWidget, SystemWidget, TailscaleWidget};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use feeds::{FeedItem, FeedSource, MAX_FEED_ITEMS};
use pulsed_client::{ContainerLogs, DockerInventory, RestartAck, StatusSource};
use std::sync::Arc;
use std::time::Duration;

use crate::config::DockerConfig;
use crate::scheduler::{Fetch, PollerHandle};
use crate::weather::{WeatherClient, WeatherReport};

/// One feed from the registry
pub struct FeedWidget {
    name: String,
    source: Box<dyn FeedSource>,
}

impl FeedWidget {
    pub fn new(name: impl Into<String>, source: Box<dyn FeedSource>) -> Self {
        Self {
            name: name.into(),
            source,
        }
    }
}

#[async_trait]
impl Fetch for FeedWidget {
    type Output = Vec<FeedItem>;

    fn name(&self) -> &str {
        &self.name
    }

    fn failure_message(&self) -> &str {
        "Failed to load feed"
    }

    async fn fetch(&self) -> Result<Vec<FeedItem>> {
        let mut items = self.source.fetch().await?;
        items.truncate(MAX_FEED_ITEMS);
        tracing::debug!(feed = self.source.id(), "Loaded {} items", items.len());
        Ok(items)
    }
}

pub struct WeatherWidget {
    client: WeatherClient,
}

impl WeatherWidget {
    pub fn new(client: WeatherClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetch for WeatherWidget {
    type Output = WeatherReport;

    fn name(&self) -> &str {
        "weather"
    }

    fn failure_message(&self) -> &str {
        "Weather unavailable"
    }

    async fn fetch(&self) -> Result<WeatherReport> {
        self.client.current().await
    }
}

/// Container actions that sit beside the docker widget
pub struct DockerActions {
    source: Arc<dyn StatusSource>,
    log_lines: u32,
    repoll: Duration,
}

impl DockerActions {
    pub fn new(source: Arc<dyn StatusSource>, config: &DockerConfig) -> Self {
        Self {
            source,
            log_lines: config.log_lines,
            repoll: config.restart_repoll(),
        }
    }

    /// Container id for `target`: an exact id, a name, or an id prefix
    pub async fn resolve(&self, target: &str) -> Result<String> {
        let inventory = self.source.docker_containers().await?;
        let containers = &inventory.containers;
        containers
            .iter()
            .find(|c| c.id == target || c.name == target)
            .or_else(|| containers.iter().find(|c| c.id.starts_with(target)))
            .map(|c| c.id.clone())
            .ok_or_else(|| anyhow!("no container with id or name '{}'", target))
    }

    pub async fn logs(&self, target: &str) -> Result<ContainerLogs> {
        let id = self.resolve(target).await?;
        Ok(self.source.docker_logs(&id, self.log_lines).await?)
    }

    /// Restart a container, then re-poll the inventory once it has had time
    /// to come back
    pub async fn restart(
        &self,
        target: &str,
        docker: Option<&PollerHandle<DockerInventory>>,
    ) -> Result<RestartAck> {
        let id = self.resolve(target).await?;
        tracing::info!("Restarting container {} ({})", target, id);
        let ack = self.source.docker_restart(&id).await?;
        if let Some(docker) = docker {
            docker.refresh_after(self.repoll);
        }
        Ok(ack)
    }

    /// Restart and return the inventory as seen after the re-poll delay
    pub async fn restart_and_wait(&self, target: &str) -> Result<(RestartAck, DockerInventory)> {
        let ack = self.restart(target, None).await?;
        tokio::time::sleep(self.repoll).await;
        let inventory = self.source.docker_containers().await?;
        Ok((ack, inventory))
    }
}


#[cfg(test)]
mod tests {
    use super::fake::FakeAgent;
    use super::*;
    use crate::scheduler::{poll_once, Backoff, Phase, Poller};
    use feeds::FeedResult;
    use std::sync::atomic::Ordering;

    struct ManyItems;

    #[async_trait]
    impl FeedSource for ManyItems {
        fn id(&self) -> &str {
            "many"
        }

        async fn fetch(&self) -> FeedResult<Vec<FeedItem>> {
            Ok((0..40)
                .map(|i| FeedItem::new(format!("Item {}", i), format!("https://x.test/{}", i)))
                .collect())
        }
    }

    #[tokio::test]
    async fn test_system_widget() {
        let agent = Arc::new(FakeAgent::default());
        let widget = SystemWidget::new(agent.clone());

        let snapshot = poll_once(&widget).await;
        assert_eq!(snapshot.name, "system");
        assert_eq!(snapshot.phase, Phase::Ready);
        assert_eq!(snapshot.data.unwrap().cpu_count, 8);
    }

    #[tokio::test]
    async fn test_agent_503_fails_closed() {
        let agent = Arc::new(FakeAgent::default());
        agent.offline.store(true, Ordering::SeqCst);

        let snapshot = poll_once(&SystemWidget::new(agent.clone())).await;
        assert_eq!(snapshot.phase, Phase::Failed);
        assert!(snapshot.data.is_none());
        let error = snapshot.error.unwrap();
        assert_eq!(error.message, "Pulsed offline");
        assert_eq!(error.detail, "Pulsed API error: 503");

        let snapshot = poll_once(&DockerWidget::new(agent.clone())).await;
        assert_eq!(snapshot.error.unwrap().message, "Docker unavailable");

        let snapshot = poll_once(&TailscaleWidget::new(agent)).await;
        assert_eq!(snapshot.error.unwrap().message, "Tailscale unavailable");
    }

    #[tokio::test]
    async fn test_feed_widget_caps_items() {
        let widget = FeedWidget::new("Many", Box::new(ManyItems));
        let snapshot = poll_once(&widget).await;

        assert_eq!(snapshot.name, "Many");
        let items = snapshot.data.unwrap();
        assert_eq!(items.len(), 15);
        assert_eq!(items[0].title, "Item 0");
    }

    #[tokio::test]
    async fn test_logs_request_configured_lines() {
        let agent = Arc::new(FakeAgent::default());
        let actions = DockerActions::new(agent.clone(), &DockerConfig::default());

        let logs = actions.logs("abc").await.unwrap();
        assert_eq!(logs.lines, vec!["listening on :80"]);
        assert_eq!(agent.log_requests.lock()[0], ("abc".to_string(), 50));
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_repolls_after_delay() {
        let agent = Arc::new(FakeAgent::default());
        let docker = Poller::new(DockerWidget::new(agent.clone()), Duration::from_secs(10))
            .with_backoff(Backoff::disabled())
            .spawn();
        let actions = DockerActions::new(agent.clone(), &DockerConfig::default());

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(agent.docker_calls.load(Ordering::SeqCst), 1);

        // Resolving the target reads the inventory once more
        let ack = actions.restart("abc", Some(&docker)).await.unwrap();
        assert_eq!(ack.container, "abc");
        assert_eq!(*agent.restarts.lock(), vec!["abc".to_string()]);
        assert_eq!(agent.docker_calls.load(Ordering::SeqCst), 2);

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(agent.docker_calls.load(Ordering::SeqCst), 2);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(agent.docker_calls.load(Ordering::SeqCst), 3);

        docker.shutdown().await;
    }

    #[tokio::test]
    async fn test_restart_by_name_uses_container_id() {
        let agent = Arc::new(FakeAgent::default());
        let actions = DockerActions::new(agent.clone(), &DockerConfig::default());

        let ack = actions.restart("def-app", None).await.unwrap();
        assert_eq!(ack.container, "def");
        assert_eq!(*agent.restarts.lock(), vec!["def".to_string()]);

        actions.logs("abc-app").await.unwrap();
        assert_eq!(agent.log_requests.lock()[0].0, "abc");
    }

    #[tokio::test]
    async fn test_restart_unknown_container() {
        let agent = Arc::new(FakeAgent::default());
        let actions = DockerActions::new(agent.clone(), &DockerConfig::default());

        let err = actions.restart("nginx", None).await.unwrap_err();
        assert!(err.to_string().contains("nginx"));
        assert!(agent.restarts.lock().is_empty());
    }

    #[tokio::test]
    async fn test_failed_restart_skips_repoll() {
        let agent = Arc::new(FakeAgent::default());
        agent.offline.store(true, Ordering::SeqCst);
        let actions = DockerActions::new(agent.clone(), &DockerConfig::default());

        let err = actions.restart("abc", None).await.unwrap_err();
        assert!(err.to_string().contains("503"));
        assert!(agent.restarts.lock().is_empty());
    }
}
