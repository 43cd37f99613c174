//! skylily - homelab dashboard in the terminal

use anyhow::Result;
use clap::Parser;

use skylily::cli::{Cli, Commands};
use skylily::{commands, DashboardConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    dash_common::init_tracing("skylily", cli.verbose)?;

    let mut config = DashboardConfig::load(cli.config.as_deref())?;
    if let Some(url) = cli.pulsed_url {
        config.pulsed.url = url;
    }
    let verbose = cli.verbose > 0;

    match cli.command {
        Commands::Run => commands::run(config, verbose).await,
        Commands::Once => commands::once(config, verbose).await,
        Commands::Health => commands::health(&config).await,
        Commands::Docker { command } => commands::docker(&config, command).await,
        Commands::Feeds { command } => commands::manage_feeds(&config, command, verbose).await,
        Commands::Links { command } => commands::manage_links(&config, command),
        Commands::Proxy { port } => commands::proxy(config, port).await,
    }
}
