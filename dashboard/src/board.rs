//! Dashboard runner
//!
//! Wires the configured widgets to the scheduler and prints their updates.

use anyhow::{Context, Result};
use feeds::{FeedContext, FeedRegistry};
use pulsed_client::{PulsedClient, StatusSource};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncBufReadExt;
use tokio::task::JoinHandle;

use crate::config::DashboardConfig;
use crate::render::{render_snapshot, Render};
use crate::scheduler::{poll_once, Backoff, Fetch, Poller, WidgetControl};
use crate::weather::WeatherClient;
use crate::widgets::{
    DockerWidget, FeedWidget, NetworkWidget, ServicesWidget, SystemWidget, TailscaleWidget,
    WeatherWidget,
};

/// Build the agent client described by the config
pub fn connect(config: &DashboardConfig) -> Result<PulsedClient> {
    let mut builder = reqwest::Client::builder();
    if let Some(secs) = config.pulsed.timeout_seconds {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    let http = builder.build().context("failed to build HTTP client")?;

    let mut client = PulsedClient::with_http_client(http, &config.pulsed.url)?;
    if config.pulsed.coalesce {
        client = client.with_coalescing();
    }
    Ok(client)
}

/// Stored feed list, or the defaults when nothing is stored
pub fn load_registry(config: &DashboardConfig) -> FeedRegistry {
    match config.feeds.store_path() {
        Some(path) => FeedRegistry::load(&path),
        None => FeedRegistry::defaults(),
    }
}

pub struct Dashboard {
    config: DashboardConfig,
    source: Arc<dyn StatusSource>,
    registry: FeedRegistry,
    feed_context: FeedContext,
    verbose: bool,
}

impl Dashboard {
    pub fn new(
        config: DashboardConfig,
        source: Arc<dyn StatusSource>,
        registry: FeedRegistry,
    ) -> Result<Self> {
        let mut feed_context = FeedContext::new(&config.feeds)?;
        if let Some(proxy) = &config.proxy_url {
            feed_context = feed_context.with_proxy(proxy.clone());
        }

        Ok(Self {
            config,
            source,
            registry,
            feed_context,
            verbose: false,
        })
    }

    pub fn from_config(config: DashboardConfig) -> Result<Self> {
        let source = Arc::new(connect(&config)?);
        let registry = load_registry(&config);
        Self::new(config, source, registry)
    }

    /// Include failure causes in output
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    fn weather(&self) -> Result<WeatherWidget> {
        let timeout = Duration::from_secs(self.config.feeds.fetch.timeout_seconds);
        let client = WeatherClient::new(self.config.weather.clone(), timeout)?;
        Ok(WeatherWidget::new(client))
    }

    /// One widget per enabled feed; misconfigured feeds are skipped
    fn feeds(&self) -> Vec<FeedWidget> {
        self.registry
            .enabled()
            .filter_map(|feed| match self.feed_context.source_for(feed) {
                Ok(source) => Some(FeedWidget::new(feed.display_name.clone(), source)),
                Err(e) => {
                    tracing::warn!("Skipping feed {}: {}", feed.id, e);
                    None
                }
            })
            .collect()
    }

    /// Fetch every widget once, concurrently, and render the results in a
    /// fixed order
    pub async fn once(&self) -> Result<Vec<String>> {
        let verbose = self.verbose;
        let weather = self.weather()?;
        let feeds = self.feeds();

        let (system, docker, services, tailscale, network, weather) = tokio::join!(
            render_once(SystemWidget::new(self.source.clone()), verbose),
            render_once(DockerWidget::new(self.source.clone()), verbose),
            render_once(ServicesWidget::new(self.source.clone()), verbose),
            render_once(TailscaleWidget::new(self.source.clone()), verbose),
            render_once(NetworkWidget::new(self.source.clone()), verbose),
            render_once(weather, verbose),
        );
        let feeds =
            futures::future::join_all(feeds.into_iter().map(|w| render_once(w, verbose))).await;

        let mut blocks = vec![system, docker, services, tailscale, network, weather];
        blocks.extend(feeds);
        Ok(blocks)
    }

    /// Poll until Ctrl+C, printing each settled update
    ///
    /// A blank line on stdin refreshes every widget.
    pub async fn run(&self) -> Result<()> {
        let intervals = &self.config.intervals;
        let backoff = Backoff::from(&self.config.backoff);
        let mut board = Board::new(backoff, self.verbose);

        board.start(SystemWidget::new(self.source.clone()), intervals.system);
        board.start(DockerWidget::new(self.source.clone()), intervals.docker);
        board.start(ServicesWidget::new(self.source.clone()), intervals.services);
        board.start(TailscaleWidget::new(self.source.clone()), intervals.tailscale);
        board.start(NetworkWidget::new(self.source.clone()), intervals.network);
        board.start(self.weather()?, intervals.weather);
        for feed in self.feeds() {
            board.start(feed, intervals.feeds);
        }

        tracing::info!("Polling {} widgets", board.controls.len());
        println!("Press Enter to refresh, Ctrl+C to stop\n");

        let mut stdin = tokio::io::BufReader::new(tokio::io::stdin()).lines();
        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => break,
                line = stdin.next_line() => match line {
                    Ok(Some(_)) => board.refresh_all(),
                    // stdin closed; keep polling until interrupted
                    Ok(None) | Err(_) => {
                        tokio::signal::ctrl_c().await?;
                        break;
                    }
                },
            }
        }

        board.stop_all();
        Ok(())
    }
}

async fn render_once<F>(fetcher: F, verbose: bool) -> String
where
    F: Fetch,
    F::Output: Render,
{
    render_snapshot(&poll_once(&fetcher).await, verbose)
}

/// Running pollers plus the tasks printing their updates
struct Board {
    backoff: Backoff,
    verbose: bool,
    controls: Vec<Box<dyn WidgetControl>>,
    printers: Vec<JoinHandle<()>>,
}

impl Board {
    fn new(backoff: Backoff, verbose: bool) -> Self {
        Self {
            backoff,
            verbose,
            controls: Vec::new(),
            printers: Vec::new(),
        }
    }

    fn start<F>(&mut self, fetcher: F, interval_secs: u64)
    where
        F: Fetch,
        F::Output: Render,
    {
        let handle = Poller::new(fetcher, Duration::from_secs(interval_secs.max(1)))
            .with_backoff(self.backoff)
            .spawn();

        let mut updates = handle.subscribe();
        let verbose = self.verbose;
        self.printers.push(tokio::spawn(async move {
            while updates.changed().await.is_ok() {
                let snapshot = updates.borrow_and_update().clone();
                if snapshot.is_settled() {
                    println!("{}\n", render_snapshot(&snapshot, verbose));
                }
            }
        }));

        self.controls.push(Box::new(handle));
    }

    fn refresh_all(&self) {
        for control in &self.controls {
            tracing::debug!("Refreshing {}", control.name());
            control.refresh();
        }
    }

    fn stop_all(&mut self) {
        for printer in self.printers.drain(..) {
            printer.abort();
        }
        for control in &self.controls {
            control.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::fake::FakeAgent;
    use feeds::{FeedSourceDescriptor, FetchStrategy};
    use std::sync::atomic::Ordering;

    fn offline_weather() -> DashboardConfig {
        let mut config = DashboardConfig::default();
        // Nothing listens on port 9 locally
        config.weather.api_url = "http://127.0.0.1:9".to_string();
        config.feeds.fetch.timeout_seconds = 2;
        config
    }

    fn no_feeds() -> FeedRegistry {
        let mut registry = FeedRegistry::defaults();
        let ids: Vec<String> = registry.all().iter().map(|f| f.id.clone()).collect();
        for id in ids {
            registry.remove(&id);
        }
        registry
    }

    #[tokio::test]
    async fn test_once_renders_every_widget_in_order() {
        let agent = Arc::new(FakeAgent::default());
        let dashboard = Dashboard::new(offline_weather(), agent, no_feeds()).unwrap();

        let blocks = dashboard.once().await.unwrap();
        assert_eq!(blocks.len(), 6);

        let names: Vec<&str> = blocks
            .iter()
            .map(|b| b.lines().next().unwrap().split("] ").nth(1).unwrap())
            .map(|head| head.split(':').next().unwrap())
            .collect();
        assert_eq!(
            names,
            vec!["system", "docker", "services", "tailscale", "network", "weather"]
        );
        assert!(blocks[5].ends_with("weather: Weather unavailable"));
    }

    #[tokio::test]
    async fn test_once_with_agent_down() {
        let agent = Arc::new(FakeAgent::default());
        agent.offline.store(true, Ordering::SeqCst);
        let dashboard = Dashboard::new(offline_weather(), agent, no_feeds()).unwrap();

        let blocks = dashboard.once().await.unwrap();
        assert!(blocks[0].ends_with("system: Pulsed offline"));
        assert!(blocks[1].ends_with("docker: Docker unavailable"));
    }

    #[test]
    fn test_misconfigured_feed_is_skipped() {
        let good = FeedSourceDescriptor {
            id: "blog".into(),
            display_name: "Blog".into(),
            color: "#000000".into(),
            fetch_strategy: FetchStrategy::RssXml,
            endpoint_url: Some("https://blog.x.test/rss".into()),
            enabled: true,
        };
        let broken = FeedSourceDescriptor {
            id: "broken".into(),
            endpoint_url: None,
            ..good.clone()
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feeds.json");
        std::fs::write(&path, serde_json::to_string(&vec![good, broken]).unwrap()).unwrap();

        let registry = FeedRegistry::load(&path);
        assert_eq!(registry.enabled().count(), 2);

        let agent = Arc::new(FakeAgent::default());
        let dashboard = Dashboard::new(offline_weather(), agent, registry).unwrap();
        let feeds = dashboard.feeds();
        assert_eq!(feeds.len(), 1);
        assert_eq!(feeds[0].name(), "Blog");
    }

    #[test]
    fn test_connect_rejects_bad_url() {
        let mut config = DashboardConfig::default();
        config.pulsed.url = "not a url".to_string();
        assert!(connect(&config).is_err());

        config.pulsed.url = "http://nas.local:9876".to_string();
        config.pulsed.coalesce = true;
        assert_eq!(connect(&config).unwrap().base_url(), "http://nas.local:9876/");
    }
}
