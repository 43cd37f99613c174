//! Feed source registry
//!
//! Maps feed ids to a fetch strategy plus display metadata. The built-in
//! list is used until the user changes something; after that the whole list
//! is stored as JSON.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How a feed is fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FetchStrategy {
    /// RSS 2.0 or Atom document at `endpoint_url`
    RssXml,
    /// Hacker News id list plus per-item JSON
    SocialJson,
}

/// Static description of one feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedSourceDescriptor {
    pub id: String,
    pub display_name: String,
    /// Accent color, CSS hex
    pub color: String,
    pub fetch_strategy: FetchStrategy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint_url: Option<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl FeedSourceDescriptor {
    fn rss(id: &str, name: &str, url: &str, color: &str, enabled: bool) -> Self {
        Self {
            id: id.to_string(),
            display_name: name.to_string(),
            color: color.to_string(),
            fetch_strategy: FetchStrategy::RssXml,
            endpoint_url: Some(url.to_string()),
            enabled,
        }
    }
}

/// The set of feeds shown on the dashboard, in display order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedRegistry {
    feeds: Vec<FeedSourceDescriptor>,
}

impl Default for FeedRegistry {
    fn default() -> Self {
        Self::defaults()
    }
}

impl FeedRegistry {
    /// The built-in feed list
    pub fn defaults() -> Self {
        let feeds = vec![
            FeedSourceDescriptor {
                id: "hn".to_string(),
                display_name: "Hacker News".to_string(),
                color: "#f97316".to_string(),
                fetch_strategy: FetchStrategy::SocialJson,
                endpoint_url: None,
                enabled: true,
            },
            FeedSourceDescriptor::rss(
                "github",
                "GitHub Trending",
                "https://mshibanami.github.io/GitHubTrendingRSS/daily/all.xml",
                "#0ea5e9",
                true,
            ),
            FeedSourceDescriptor::rss(
                "producthunt",
                "Product Hunt",
                "https://www.producthunt.com/feed",
                "#ec4899",
                true,
            ),
            FeedSourceDescriptor::rss("lobsters", "Lobste.rs", "https://lobste.rs/rss", "#ef4444", true),
            FeedSourceDescriptor::rss("devto", "Dev.to", "https://dev.to/feed", "#a855f7", true),
            FeedSourceDescriptor::rss(
                "techcrunch",
                "TechCrunch",
                "https://techcrunch.com/feed/",
                "#22c55e",
                false,
            ),
            FeedSourceDescriptor::rss(
                "arstechnica",
                "Ars Technica",
                "https://feeds.arstechnica.com/arstechnica/index",
                "#f59e0b",
                false,
            ),
        ];

        Self { feeds }
    }

    /// Load the stored list, falling back to the defaults when the file is
    /// missing or unreadable
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::defaults();
        }

        match Self::read(path) {
            Ok(registry) => registry,
            Err(e) => {
                tracing::warn!("Ignoring feed store {}: {:#}", path.display(), e);
                Self::defaults()
            }
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let feeds: Vec<FeedSourceDescriptor> = serde_json::from_str(&content)?;
        Ok(Self { feeds })
    }

    /// Write the list as JSON, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(&self.feeds)?;
        std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
        tracing::debug!("Saved {} feeds to {}", self.feeds.len(), path.display());
        Ok(())
    }

    pub fn all(&self) -> &[FeedSourceDescriptor] {
        &self.feeds
    }

    pub fn enabled(&self) -> impl Iterator<Item = &FeedSourceDescriptor> {
        self.feeds.iter().filter(|f| f.enabled)
    }

    pub fn get(&self, id: &str) -> Option<&FeedSourceDescriptor> {
        self.feeds.iter().find(|f| f.id == id)
    }

    /// Add a custom RSS feed and return its id
    pub fn add(&mut self, name: &str, url: &str, color: &str) -> Result<String> {
        let name = name.trim();
        if name.is_empty() {
            bail!("feed name cannot be empty");
        }

        let parsed = url::Url::parse(url.trim()).with_context(|| format!("invalid feed URL '{}'", url))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            bail!("feed URL must be http or https, got '{}'", parsed.scheme());
        }

        let id = self.next_custom_id();
        self.feeds.push(FeedSourceDescriptor::rss(&id, name, parsed.as_str(), color, true));
        Ok(id)
    }

    /// Remove a feed; returns whether it existed
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.feeds.len();
        self.feeds.retain(|f| f.id != id);
        self.feeds.len() != before
    }

    /// Flip a feed's enabled flag; returns the new state
    pub fn toggle(&mut self, id: &str) -> Option<bool> {
        let feed = self.feeds.iter_mut().find(|f| f.id == id)?;
        feed.enabled = !feed.enabled;
        Some(feed.enabled)
    }

    /// `custom-<millis>`, suffixed when two feeds land in the same millisecond
    fn next_custom_id(&self) -> String {
        let base = format!("custom-{}", chrono::Utc::now().timestamp_millis());
        let mut id = base.clone();
        let mut n = 1;
        while self.get(&id).is_some() {
            id = format!("{}-{}", base, n);
            n += 1;
        }
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let registry = FeedRegistry::defaults();
        assert_eq!(registry.all().len(), 7);
        assert_eq!(registry.enabled().count(), 5);

        let hn = registry.get("hn").unwrap();
        assert_eq!(hn.fetch_strategy, FetchStrategy::SocialJson);
        assert!(hn.endpoint_url.is_none());
    }

    #[test]
    fn test_add_remove_toggle() {
        let mut registry = FeedRegistry::defaults();

        let id = registry
            .add("My Blog", "https://blog.x.test/rss", "#123456")
            .unwrap();
        assert!(id.starts_with("custom-"));

        let feed = registry.get(&id).unwrap();
        assert_eq!(feed.display_name, "My Blog");
        assert!(feed.enabled);

        assert_eq!(registry.toggle(&id), Some(false));
        assert_eq!(registry.toggle(&id), Some(true));
        assert_eq!(registry.toggle("missing"), None);

        assert!(registry.remove(&id));
        assert!(!registry.remove(&id));
        assert!(registry.get(&id).is_none());
    }

    #[test]
    fn test_add_generates_unique_ids() {
        let mut registry = FeedRegistry::defaults();
        let a = registry.add("A", "https://a.test/rss", "#000").unwrap();
        let b = registry.add("B", "https://b.test/rss", "#000").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_add_rejects_bad_input() {
        let mut registry = FeedRegistry::defaults();
        assert!(registry.add("", "https://x.test", "#000").is_err());
        assert!(registry.add("x", "not a url", "#000").is_err());
        assert!(registry.add("x", "ftp://x.test/feed", "#000").is_err());
        assert_eq!(registry.all().len(), 7);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("feeds.json");

        let mut registry = FeedRegistry::defaults();
        registry.toggle("techcrunch");
        registry.remove("devto");
        registry.save(&path).unwrap();

        let loaded = FeedRegistry::load(&path);
        assert_eq!(loaded, registry);
        assert!(loaded.get("techcrunch").unwrap().enabled);
        assert!(loaded.get("devto").is_none());
    }

    #[test]
    fn test_load_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();

        let missing = dir.path().join("missing.json");
        assert_eq!(FeedRegistry::load(&missing), FeedRegistry::defaults());

        let corrupt = dir.path().join("corrupt.json");
        std::fs::write(&corrupt, "{not json").unwrap();
        assert_eq!(FeedRegistry::load(&corrupt), FeedRegistry::defaults());
    }

    #[test]
    fn test_strategy_wire_names() {
        let json = serde_json::to_string(&FetchStrategy::RssXml).unwrap();
        assert_eq!(json, "\"rss-xml\"");
        let json = serde_json::to_string(&FetchStrategy::SocialJson).unwrap();
        assert_eq!(json, "\"social-json\"");
    }
}
