//! Dashboard configuration
//!
//! Configuration is loaded from:
//! 1. Path given with `--config`
//! 2. `.skylily.toml` found by walking up from the current directory
//! 3. ~/.config/skylily/.skylily.toml
//! 4. Default values
//!
//! `PULSED_URL` and `FEED_PROXY_PORT` override the file.
//!
//! ```toml
//! [pulsed]
//! url = "http://nas.local:9876"
//! coalesce = true
//!
//! [intervals]
//! system = 5
//! docker = 10
//!
//! [backoff]
//! multiplier = 2
//! max_seconds = 300
//!
//! [weather]
//! latitude = 52.52
//! longitude = 13.41
//! timezone = "Europe/Berlin"
//! location = "Berlin"
//!
//! [feeds.proxy]
//! port = 3001
//!
//! [links]
//! store_path = "/srv/skylily/links.json"
//! ```

use anyhow::Result;
use feeds::FeedsConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILE_NAME: &str = ".skylily.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub pulsed: PulsedConfig,
    #[serde(default)]
    pub intervals: IntervalConfig,
    #[serde(default)]
    pub backoff: BackoffConfig,
    #[serde(default)]
    pub docker: DockerConfig,
    #[serde(default)]
    pub weather: WeatherConfig,
    #[serde(default)]
    pub feeds: FeedsConfig,
    #[serde(default)]
    pub links: LinksConfig,
    /// Route RSS feeds through a running feed proxy, e.g. `http://localhost:3001`
    #[serde(default)]
    pub proxy_url: Option<String>,
}

/// Status agent connection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PulsedConfig {
    #[serde(default = "default_pulsed_url")]
    pub url: String,
    /// Per-request timeout; none when unset
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
    /// Share one request between identical concurrent reads
    #[serde(default)]
    pub coalesce: bool,
}

/// Poll intervals in seconds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntervalConfig {
    #[serde(default = "default_system_interval")]
    pub system: u64,
    #[serde(default = "default_docker_interval")]
    pub docker: u64,
    #[serde(default = "default_tailscale_interval")]
    pub tailscale: u64,
    #[serde(default = "default_services_interval")]
    pub services: u64,
    #[serde(default = "default_network_interval")]
    pub network: u64,
    #[serde(default = "default_feeds_interval")]
    pub feeds: u64,
    #[serde(default = "default_weather_interval")]
    pub weather: u64,
}

/// Delay growth after consecutive failures
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackoffConfig {
    /// Factor applied per consecutive failure; 1 disables backoff
    #[serde(default = "default_backoff_multiplier")]
    pub multiplier: u32,
    /// Upper bound on the delay between polls
    #[serde(default = "default_backoff_max")]
    pub max_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DockerConfig {
    /// Lines requested when viewing logs
    #[serde(default = "default_log_lines")]
    pub log_lines: u32,
    /// Delay before re-polling after a restart
    #[serde(default = "default_restart_repoll_ms")]
    pub restart_repoll_ms: u64,
}

/// Open-Meteo location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    #[serde(default = "default_weather_api_url")]
    pub api_url: String,
    #[serde(default = "default_latitude")]
    pub latitude: f64,
    #[serde(default = "default_longitude")]
    pub longitude: f64,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Label shown next to the reading
    #[serde(default = "default_location")]
    pub location: String,
}

/// Bookmark link storage
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinksConfig {
    /// Where links are stored (default: ~/.config/skylily/links.json)
    #[serde(default)]
    pub store_path: Option<PathBuf>,
}

impl LinksConfig {
    pub fn store_path(&self) -> Option<PathBuf> {
        self.store_path.clone().or_else(|| {
            dirs::config_dir().map(|dir| dir.join(dash_common::CONFIG_DIR_NAME).join("links.json"))
        })
    }
}

// Default value functions
fn default_pulsed_url() -> String {
    pulsed_client::DEFAULT_PULSED_URL.to_string()
}

fn default_system_interval() -> u64 {
    5
}

fn default_docker_interval() -> u64 {
    10
}

fn default_tailscale_interval() -> u64 {
    30
}

fn default_services_interval() -> u64 {
    60
}

fn default_network_interval() -> u64 {
    30
}

fn default_feeds_interval() -> u64 {
    300
}

fn default_weather_interval() -> u64 {
    30 * 60
}

fn default_backoff_multiplier() -> u32 {
    2
}

fn default_backoff_max() -> u64 {
    300
}

fn default_log_lines() -> u32 {
    50
}

fn default_restart_repoll_ms() -> u64 {
    2000
}

fn default_weather_api_url() -> String {
    "https://api.open-meteo.com".to_string()
}

fn default_latitude() -> f64 {
    28.6139
}

fn default_longitude() -> f64 {
    77.2090
}

fn default_timezone() -> String {
    "Asia/Kolkata".to_string()
}

fn default_location() -> String {
    "Delhi".to_string()
}

impl Default for PulsedConfig {
    fn default() -> Self {
        Self {
            url: default_pulsed_url(),
            timeout_seconds: None,
            coalesce: false,
        }
    }
}

impl Default for IntervalConfig {
    fn default() -> Self {
        Self {
            system: default_system_interval(),
            docker: default_docker_interval(),
            tailscale: default_tailscale_interval(),
            services: default_services_interval(),
            network: default_network_interval(),
            feeds: default_feeds_interval(),
            weather: default_weather_interval(),
        }
    }
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            multiplier: default_backoff_multiplier(),
            max_seconds: default_backoff_max(),
        }
    }
}

impl Default for DockerConfig {
    fn default() -> Self {
        Self {
            log_lines: default_log_lines(),
            restart_repoll_ms: default_restart_repoll_ms(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_url: default_weather_api_url(),
            latitude: default_latitude(),
            longitude: default_longitude(),
            timezone: default_timezone(),
            location: default_location(),
        }
    }
}

impl DockerConfig {
    pub fn restart_repoll(&self) -> Duration {
        Duration::from_millis(self.restart_repoll_ms)
    }
}

impl DashboardConfig {
    /// Load from an explicit path, a discovered `.skylily.toml`, or defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path: Option<PathBuf> = explicit
            .map(Path::to_path_buf)
            .or_else(|| dash_common::find_config_file(CONFIG_FILE_NAME));

        let mut config = match path {
            Some(path) => {
                tracing::info!("Loading config from: {}", path.display());
                dash_common::load_toml::<Self>(&path)?
            }
            None => {
                tracing::debug!("No config file found, using defaults");
                Self::default()
            }
        };

        config.apply_env();
        Ok(config)
    }

    /// Environment overrides (highest priority)
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("PULSED_URL") {
            if !url.trim().is_empty() {
                self.pulsed.url = url;
            }
        }
        self.feeds.apply_env();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_widget_cadence() {
        let config = DashboardConfig::default();
        assert_eq!(config.pulsed.url, "http://localhost:9876");
        assert!(!config.pulsed.coalesce);
        assert_eq!(config.intervals.system, 5);
        assert_eq!(config.intervals.docker, 10);
        assert_eq!(config.intervals.tailscale, 30);
        assert_eq!(config.intervals.services, 60);
        assert_eq!(config.intervals.weather, 1800);
        assert_eq!(config.docker.log_lines, 50);
        assert_eq!(config.docker.restart_repoll(), Duration::from_secs(2));
    }

    #[test]
    fn test_partial_file() {
        let config: DashboardConfig = toml::from_str(
            r#"
            proxy_url = "http://localhost:3001"

            [pulsed]
            url = "http://nas.local:9876"
            coalesce = true

            [intervals]
            docker = 20

            [weather]
            location = "Berlin"

            [feeds.hackernews]
            max_items = 10

            [links]
            store_path = "/srv/skylily/links.json"
            "#,
        )
        .unwrap();

        assert_eq!(config.pulsed.url, "http://nas.local:9876");
        assert!(config.pulsed.coalesce);
        assert_eq!(config.intervals.docker, 20);
        assert_eq!(config.intervals.system, 5);
        assert_eq!(config.weather.location, "Berlin");
        assert_eq!(config.weather.timezone, "Asia/Kolkata");
        assert_eq!(config.feeds.hackernews.max_items, 10);
        assert_eq!(config.proxy_url.as_deref(), Some("http://localhost:3001"));
        assert_eq!(
            config.links.store_path(),
            Some(PathBuf::from("/srv/skylily/links.json"))
        );
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dash.toml");
        std::fs::write(&path, "[backoff]\nmultiplier = 1\n").unwrap();

        let config = DashboardConfig::load(Some(&path)).unwrap();
        assert_eq!(config.backoff.multiplier, 1);
        assert_eq!(config.backoff.max_seconds, 300);
    }

    #[test]
    fn test_load_rejects_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dash.toml");
        std::fs::write(&path, "[pulsed\nurl = ").unwrap();

        assert!(DashboardConfig::load(Some(&path)).is_err());
    }
}
