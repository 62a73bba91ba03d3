//! # rosterctl
//!
//! Command line front end for Roster: seeds synthetic users, recomputes
//! their risk scores and prints sorted listings from Redis.

use anyhow::{Context, Result};
use clap::Parser;
use roster_config::{ConfigLoader, ConfigLoaderOptions};
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;

use cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let load = ConfigLoader::with_options(ConfigLoaderOptions {
        config_path: cli.global.config.clone(),
        env_file: cli.global.env_file.clone(),
    })
    .load()
    .context("failed to load configuration")?;

    for warning in &load.warnings.items {
        match &warning.hint {
            Some(hint) => warn!("{} ({})", warning.message, hint),
            None => warn!("{}", warning.message),
        }
    }

    let mut config = load.config;
    if let Some(url) = cli.global.redis_url.clone() {
        config.redis.url = url;
    }

    commands::run(cli.command, &config).await
}
