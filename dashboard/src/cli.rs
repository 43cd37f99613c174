//! CLI argument definitions

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

use crate::links::{LinkView, DEFAULT_CATEGORY, DEFAULT_ICON};

#[derive(Parser)]
#[command(name = "skylily")]
#[command(about = "Homelab dashboard: system, docker, tailscale, services, feeds and weather")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Status agent URL (default: from .skylily.toml or http://localhost:9876)
    #[arg(long, env = "PULSED_URL", global = true)]
    pub pulsed_url: Option<String>,

    /// Config file (default: nearest .skylily.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v debug, -vv trace). Default is info.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Poll every widget continuously and print updates
    Run,
    /// Poll every widget once and print a summary
    Once,
    /// Check that the status agent is reachable
    Health,
    /// Container actions
    Docker {
        #[command(subcommand)]
        command: DockerCommands,
    },
    /// Manage the feed list
    Feeds {
        #[command(subcommand)]
        command: FeedsCommands,
    },
    /// Manage bookmark links
    Links {
        #[command(subcommand)]
        command: LinksCommands,
    },
    /// Serve the feed proxy
    Proxy {
        /// Port to listen on (default: from config or 3001)
        #[arg(long, env = "FEED_PROXY_PORT")]
        port: Option<u16>,
    },
}

#[derive(Subcommand)]
pub enum DockerCommands {
    /// Show recent log lines of a container
    Logs {
        /// Container id or name
        id: String,
        /// Number of lines (default: from config or 50)
        #[arg(long)]
        lines: Option<u32>,
    },
    /// Restart a container and show its state afterwards
    Restart {
        /// Container id or name
        id: String,
    },
}

#[derive(Subcommand)]
pub enum FeedsCommands {
    /// List configured feeds
    List,
    /// Add a custom RSS or Atom feed
    Add {
        /// Display name
        name: String,
        /// Feed URL
        url: String,
        /// Accent color
        #[arg(long, default_value = "#71717a")]
        color: String,
    },
    /// Remove a feed
    Remove { id: String },
    /// Enable or disable a feed
    Toggle { id: String },
    /// Fetch a feed and print its items
    Show { id: String },
}

#[derive(Subcommand)]
pub enum LinksCommands {
    /// List links grouped by category
    List {
        /// Layout for this listing (default: the saved preference)
        #[arg(long, value_enum)]
        view: Option<LinkView>,
    },
    /// Add a link
    Add {
        title: String,
        url: String,
        #[arg(long, default_value = DEFAULT_CATEGORY)]
        category: String,
        /// server, sparkles, code or globe
        #[arg(long, default_value = DEFAULT_ICON)]
        icon: String,
    },
    /// Change fields of a link
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        icon: Option<String>,
    },
    /// Remove a link
    Remove { id: String },
    /// Save the default layout for `links list`
    View {
        #[arg(value_enum)]
        view: LinkView,
    },
}
