//! Command handlers behind the `skylily` binary

use anyhow::{anyhow, bail, Context, Result};
use feeds::{FeedContext, FeedRegistry, FetchStrategy};
use std::sync::Arc;

use crate::board::{connect, load_registry, Dashboard};
use crate::cli::{DockerCommands, FeedsCommands, LinksCommands};
use crate::config::{DashboardConfig, DockerConfig};
use crate::links::{render_links, LinkRegistry, LinkUpdate};
use crate::render::{format_uptime, render_snapshot};
use crate::scheduler::poll_once;
use crate::widgets::{DockerActions, FeedWidget};

pub async fn run(config: DashboardConfig, verbose: bool) -> Result<()> {
    Dashboard::from_config(config)?
        .with_verbose(verbose)
        .run()
        .await
}

pub async fn once(config: DashboardConfig, verbose: bool) -> Result<()> {
    let blocks = Dashboard::from_config(config)?
        .with_verbose(verbose)
        .once()
        .await?;
    println!("{}", blocks.join("\n\n"));
    Ok(())
}

pub async fn health(config: &DashboardConfig) -> Result<()> {
    let client = connect(config)?;
    let health = client
        .health()
        .await
        .with_context(|| format!("pulsed at {} is not healthy", client.base_url()))?;
    println!(
        "pulsed {} at {}: {} (up {})",
        health.version,
        client.base_url(),
        health.status,
        format_uptime(health.uptime_secs)
    );
    Ok(())
}

pub async fn docker(config: &DashboardConfig, command: DockerCommands) -> Result<()> {
    let source = Arc::new(connect(config)?);

    match command {
        DockerCommands::Logs { id, lines } => {
            let docker = DockerConfig {
                log_lines: lines.unwrap_or(config.docker.log_lines),
                ..config.docker.clone()
            };
            let logs = DockerActions::new(source, &docker).logs(&id).await?;
            for line in logs.lines {
                println!("{}", line);
            }
        }
        DockerCommands::Restart { id } => {
            let actions = DockerActions::new(source, &config.docker);
            let (ack, inventory) = actions.restart_and_wait(&id).await?;
            println!("{}: {}", ack.container, ack.status);

            match inventory
                .containers
                .iter()
                .find(|c| c.id == ack.container)
            {
                Some(container) => println!(
                    "{} is {} ({})",
                    container.name, container.state, container.status
                ),
                None => println!("{} not found in inventory", id),
            }
        }
    }
    Ok(())
}

/// Apply a feed list change and describe it; `Show` is handled separately
pub fn edit_feeds(registry: &mut FeedRegistry, command: &FeedsCommands) -> Result<String> {
    match command {
        FeedsCommands::List => Ok(list_feeds(registry)),
        FeedsCommands::Add { name, url, color } => {
            let id = registry.add(name, url, color)?;
            Ok(format!("Added {} as {}", name.trim(), id))
        }
        FeedsCommands::Remove { id } => {
            if !registry.remove(id) {
                bail!("no feed with id '{}'", id);
            }
            Ok(format!("Removed {}", id))
        }
        FeedsCommands::Toggle { id } => {
            let enabled = registry
                .toggle(id)
                .ok_or_else(|| anyhow!("no feed with id '{}'", id))?;
            Ok(format!(
                "{} is now {}",
                id,
                if enabled { "enabled" } else { "disabled" }
            ))
        }
        FeedsCommands::Show { .. } => bail!("show does not edit the feed list"),
    }
}

fn list_feeds(registry: &FeedRegistry) -> String {
    registry
        .all()
        .iter()
        .map(|feed| {
            let mark = if feed.enabled { "x" } else { " " };
            let target = match feed.fetch_strategy {
                FetchStrategy::SocialJson => "hacker news api".to_string(),
                FetchStrategy::RssXml => feed.endpoint_url.clone().unwrap_or_default(),
            };
            format!("[{}] {:<14} {:<18} {}", mark, feed.id, feed.display_name, target)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub async fn manage_feeds(
    config: &DashboardConfig,
    command: FeedsCommands,
    verbose: bool,
) -> Result<()> {
    let mut registry = load_registry(config);

    if let FeedsCommands::Show { id } = &command {
        let feed = registry
            .get(id)
            .ok_or_else(|| anyhow!("no feed with id '{}'", id))?;
        let mut context = FeedContext::new(&config.feeds)?;
        if let Some(proxy) = &config.proxy_url {
            context = context.with_proxy(proxy.clone());
        }
        let widget = FeedWidget::new(feed.display_name.clone(), context.source_for(feed)?);
        println!("{}", render_snapshot(&poll_once(&widget).await, verbose));
        return Ok(());
    }

    let output = edit_feeds(&mut registry, &command)?;
    if !matches!(command, FeedsCommands::List) {
        let path = config
            .feeds
            .store_path()
            .context("no config directory to store feeds in; set feeds.store_path")?;
        registry.save(&path)?;
    }
    println!("{}", output);
    Ok(())
}

/// Apply a link change and describe it; `List` only renders
pub fn edit_links(registry: &mut LinkRegistry, command: LinksCommands) -> Result<String> {
    match command {
        LinksCommands::List { view } => Ok(render_links(registry, view.unwrap_or(registry.view()))),
        LinksCommands::Add {
            title,
            url,
            category,
            icon,
        } => {
            let id = registry.add(&title, &url, &category, &icon)?;
            Ok(format!("Added {} as {}", title.trim(), id))
        }
        LinksCommands::Edit {
            id,
            title,
            url,
            category,
            icon,
        } => {
            let link = registry.update(
                &id,
                LinkUpdate {
                    title,
                    url,
                    category,
                    icon,
                },
            )?;
            Ok(format!("Updated {}: {} ({}, {})", id, link.title, link.category, link.url))
        }
        LinksCommands::Remove { id } => {
            if !registry.remove(&id) {
                bail!("no link with id '{}'", id);
            }
            Ok(format!("Removed {}", id))
        }
        LinksCommands::View { view } => {
            registry.set_view(view);
            Ok(format!("Links are now shown as a {}", view.as_str()))
        }
    }
}

pub fn manage_links(config: &DashboardConfig, command: LinksCommands) -> Result<()> {
    let path = config
        .links
        .store_path()
        .context("no config directory to store links in; set links.store_path")?;
    let mut registry = LinkRegistry::load(&path);

    let changes = !matches!(command, LinksCommands::List { .. });
    let output = edit_links(&mut registry, command)?;
    if changes {
        registry.save(&path)?;
    }
    println!("{}", output);
    Ok(())
}

pub async fn proxy(mut config: DashboardConfig, port: Option<u16>) -> Result<()> {
    if let Some(port) = port {
        config.feeds.proxy.port = port;
    }
    feeds::proxy::serve(&config.feeds).await
}
