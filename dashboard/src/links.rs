//! Bookmark links
//!
//! Kept the same way as the feed list: the built-in set is used until the
//! user changes something, then links and the view preference are stored
//! together as JSON.

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CATEGORY: &str = "Other";
pub const DEFAULT_ICON: &str = "globe";

/// How `links list` lays links out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LinkView {
    #[default]
    List,
    Grid,
}

impl LinkView {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkView::List => "list",
            LinkView::Grid => "grid",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub id: String,
    pub title: String,
    pub url: String,
    /// Icon hint: server, sparkles, code or globe
    #[serde(default = "default_icon")]
    pub icon: String,
    #[serde(default = "default_category")]
    pub category: String,
}

fn default_icon() -> String {
    DEFAULT_ICON.to_string()
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

impl Link {
    fn new(id: &str, title: &str, url: &str, category: &str, icon: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            url: url.to_string(),
            icon: icon.to_string(),
            category: category.to_string(),
        }
    }
}

/// Fields to change on an existing link; `None` keeps the current value
#[derive(Debug, Clone, Default)]
pub struct LinkUpdate {
    pub title: Option<String>,
    pub url: Option<String>,
    pub category: Option<String>,
    pub icon: Option<String>,
}

impl LinkUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.url.is_none() && self.category.is_none() && self.icon.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkRegistry {
    #[serde(default)]
    view: LinkView,
    links: Vec<Link>,
}

impl Default for LinkRegistry {
    fn default() -> Self {
        Self::defaults()
    }
}

impl LinkRegistry {
    pub fn defaults() -> Self {
        let links = vec![
            Link::new("1", "Dashy Dashboard", "https://dashy.local", "Homelab", "server"),
            Link::new("2", "Glance Dashboard", "https://glance.local", "Homelab", "server"),
            Link::new("3", "Presenton AI", "https://presenton.local", "Homelab", "sparkles"),
            Link::new("4", "Netdata Monitor", "https://netdata.local", "Homelab", "server"),
            Link::new("5", "Clawdbot Gateway", "https://clawdbot.local", "Homelab", "sparkles"),
            Link::new("6", "RSS Bridge", "https://rss-bridge.local", "Homelab", "server"),
            Link::new("7", "Uptime Kuma", "http://localhost:19999", "Homelab", "server"),
            Link::new("8", "GitHub", "https://github.com", "Dev Tools", "code"),
            Link::new("9", "VS Code Web", "https://vscode.dev", "Dev Tools", "code"),
            Link::new("10", "Vercel", "https://vercel.com", "Dev Tools", "globe"),
            Link::new("11", "Twitter/X", "https://x.com", "Social", "globe"),
            Link::new("12", "LinkedIn", "https://linkedin.com", "Social", "globe"),
        ];

        Self {
            view: LinkView::default(),
            links,
        }
    }

    /// Load the stored links, falling back to the defaults when the file is
    /// missing or unreadable
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::defaults();
        }

        let read = std::fs::read_to_string(path)
            .map_err(anyhow::Error::from)
            .and_then(|content| Ok(serde_json::from_str::<Self>(&content)?));
        match read {
            Ok(registry) => registry,
            Err(e) => {
                tracing::warn!("Ignoring link store {}: {:#}", path.display(), e);
                Self::defaults()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
        tracing::debug!("Saved {} links to {}", self.links.len(), path.display());
        Ok(())
    }

    pub fn all(&self) -> &[Link] {
        &self.links
    }

    pub fn get(&self, id: &str) -> Option<&Link> {
        self.links.iter().find(|l| l.id == id)
    }

    pub fn view(&self) -> LinkView {
        self.view
    }

    pub fn set_view(&mut self, view: LinkView) {
        self.view = view;
    }

    /// Categories in order of first appearance
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = Vec::new();
        for link in &self.links {
            if !categories.contains(&link.category.as_str()) {
                categories.push(&link.category);
            }
        }
        categories
    }

    /// Add a link and return its id
    pub fn add(&mut self, title: &str, url: &str, category: &str, icon: &str) -> Result<String> {
        let title = non_empty(title, "link title")?;
        let url = validate_url(url)?;
        let category = or_default(category, DEFAULT_CATEGORY);
        let icon = or_default(icon, DEFAULT_ICON);

        let id = self.next_id();
        self.links.push(Link::new(&id, &title, &url, &category, &icon));
        Ok(id)
    }

    /// Apply `update` to the link with `id`
    pub fn update(&mut self, id: &str, update: LinkUpdate) -> Result<&Link> {
        if update.is_empty() {
            bail!("nothing to change for link '{}'", id);
        }

        let title = update.title.as_deref().map(|t| non_empty(t, "link title")).transpose()?;
        let url = update.url.as_deref().map(validate_url).transpose()?;

        let link = self
            .links
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| anyhow!("no link with id '{}'", id))?;
        if let Some(title) = title {
            link.title = title;
        }
        if let Some(url) = url {
            link.url = url;
        }
        if let Some(category) = update.category {
            link.category = or_default(&category, DEFAULT_CATEGORY);
        }
        if let Some(icon) = update.icon {
            link.icon = or_default(&icon, DEFAULT_ICON);
        }
        Ok(&*link)
    }

    /// Remove a link; returns whether it existed
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.links.len();
        self.links.retain(|l| l.id != id);
        self.links.len() != before
    }

    /// `link-<millis>`, suffixed when two links land in the same millisecond
    fn next_id(&self) -> String {
        let base = format!("link-{}", chrono::Utc::now().timestamp_millis());
        let mut id = base.clone();
        let mut n = 1;
        while self.get(&id).is_some() {
            id = format!("{}-{}", base, n);
            n += 1;
        }
        id
    }
}

fn non_empty(value: &str, what: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        bail!("{} cannot be empty", what);
    }
    Ok(value.to_string())
}

fn or_default(value: &str, default: &str) -> String {
    match value.trim() {
        "" => default.to_string(),
        value => value.to_string(),
    }
}

fn validate_url(url: &str) -> Result<String> {
    let parsed =
        url::Url::parse(url.trim()).with_context(|| format!("invalid link URL '{}'", url))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        bail!("link URL must be http or https, got '{}'", parsed.scheme());
    }
    Ok(parsed.to_string())
}

/// Render links grouped by category, in the given layout
pub fn render_links(registry: &LinkRegistry, view: LinkView) -> String {
    let mut blocks = Vec::new();
    for category in registry.categories() {
        let links: Vec<&Link> = registry
            .all()
            .iter()
            .filter(|l| l.category == category)
            .collect();

        let body = match view {
            LinkView::List => links
                .iter()
                .map(|l| format!("  {:<16} {:<20} {}", l.id, l.title, l.url))
                .collect::<Vec<_>>(),
            LinkView::Grid => links
                .chunks(3)
                .map(|row| {
                    let cells: Vec<String> = row.iter().map(|l| format!("{:<20}", l.title)).collect();
                    format!("  {}", cells.join(" ").trim_end())
                })
                .collect(),
        };
        blocks.push(format!("{}\n{}", category, body.join("\n")));
    }

    if blocks.is_empty() {
        return "No links".to_string();
    }
    blocks.join("\n\n")
}
