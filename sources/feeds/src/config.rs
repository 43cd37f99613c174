//! Configuration for feed fetching and the feed proxy
//!
//! Configuration is loaded from:
//! 1. Environment variable FEEDS_CONFIG_PATH (a file with a `[feeds]` table)
//! 2. `.skylily.toml` found by walking up from the current directory
//! 3. ~/.config/skylily/.skylily.toml
//! 4. Default values
//!
//! `FEED_PROXY_PORT` overrides the proxy port.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Feed configuration, the `[feeds]` table of `.skylily.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedsConfig {
    /// Outbound HTTP settings
    #[serde(default)]
    pub fetch: FetchConfig,
    /// Feed proxy server settings
    #[serde(default)]
    pub proxy: ProxyConfig,
    /// Hacker News API settings
    #[serde(default)]
    pub hackernews: HackerNewsConfig,
    /// Where user feed choices are stored (default: ~/.config/skylily/feeds.json)
    #[serde(default)]
    pub store_path: Option<PathBuf>,
}

/// Outbound HTTP configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// User agent sent to feed hosts
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Largest accepted body in bytes
    #[serde(default = "default_max_response_size")]
    pub max_response_size: usize,
}

/// Feed proxy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Address to bind
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// How long a fetched feed is served from memory
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_seconds: u64,
}

/// Hacker News API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HackerNewsConfig {
    /// Firebase API root
    #[serde(default = "default_hn_api_url")]
    pub api_url: String,
    /// Prefix for discussion permalinks; the item id is appended
    #[serde(default = "default_hn_item_url")]
    pub item_url: String,
    /// Number of top stories to fetch
    #[serde(default = "default_hn_max_items")]
    pub max_items: usize,
    /// Detail requests in flight at once
    #[serde(default = "default_hn_max_concurrency")]
    pub max_concurrency: usize,
}

// Default value functions
fn default_timeout() -> u64 {
    15
}

fn default_user_agent() -> String {
    "Skylily-Dashboard/1.0".to_string()
}

fn default_max_response_size() -> usize {
    5 * 1024 * 1024
}

fn default_bind() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_cache_ttl() -> u64 {
    300 // 5 minutes
}

fn default_hn_api_url() -> String {
    "https://hacker-news.firebaseio.com".to_string()
}

fn default_hn_item_url() -> String {
    "https://news.ycombinator.com/item?id=".to_string()
}

fn default_hn_max_items() -> usize {
    15
}

fn default_hn_max_concurrency() -> usize {
    15
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            user_agent: default_user_agent(),
            max_response_size: default_max_response_size(),
        }
    }
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
            cache_ttl_seconds: default_cache_ttl(),
        }
    }
}

impl Default for HackerNewsConfig {
    fn default() -> Self {
        Self {
            api_url: default_hn_api_url(),
            item_url: default_hn_item_url(),
            max_items: default_hn_max_items(),
            max_concurrency: default_hn_max_concurrency(),
        }
    }
}

/// File layout: feeds settings live under `[feeds]`
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    feeds: FeedsConfig,
}

impl FeedsConfig {
    /// Load configuration from file or use defaults
    pub fn load() -> Result<Self> {
        let mut config = match Self::find_config_path() {
            Some(path) => {
                tracing::info!("Loading feeds config from: {}", path.display());
                dash_common::load_toml::<ConfigFile>(&path)?.feeds
            }
            None => {
                tracing::info!("No config file found, using defaults");
                Self::default()
            }
        };

        config.apply_env();
        Ok(config)
    }

    /// Environment overrides (highest priority)
    pub fn apply_env(&mut self) {
        if let Some(port) = std::env::var("FEED_PROXY_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
        {
            self.proxy.port = port;
        }
    }

    /// Resolved path of the feed store
    pub fn store_path(&self) -> Option<PathBuf> {
        self.store_path.clone().or_else(|| {
            dirs::config_dir().map(|dir| {
                dir.join(dash_common::CONFIG_DIR_NAME)
                    .join("feeds.json")
            })
        })
    }

    fn find_config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("FEEDS_CONFIG_PATH") {
            return Some(PathBuf::from(path));
        }
        dash_common::find_config_file(".skylily.toml")
    }
}
