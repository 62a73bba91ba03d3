use clap::{Args, Parser, Subcommand};
use roster_core::query::{SortDirection, SortKey};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "rosterctl",
    version,
    about = "Seed, score and list an application's users stored in Redis"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Path to roster.toml (defaults to ./roster.toml or $ROSTER_CONFIG)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to a .env file loaded before reading the environment
    #[arg(long, global = true)]
    pub env_file: Option<PathBuf>,

    /// Redis URL, overriding configuration and REDIS_URL
    #[arg(long, global = true)]
    pub redis_url: Option<String>,
}

#[derive(Debug, Args)]
pub struct AppArgs {
    /// Application id (defaults to the configured app id)
    #[arg(long = "app")]
    pub app_id: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create synthetic users and index them under an application
    Seed {
        #[command(flatten)]
        app: AppArgs,

        /// Number of users to create
        #[arg(long)]
        users: Option<usize>,

        /// Also assign an initial risk score to each user
        #[arg(long)]
        with_scores: bool,
    },

    /// Recompute the risk score of every member of an application
    PrepareScores {
        #[command(flatten)]
        app: AppArgs,
    },

    /// Print an application's users in the requested order
    List {
        #[command(flatten)]
        app: AppArgs,

        /// none, created_at, updated_at, email or score
        #[arg(long, default_value = "none")]
        sort_by: SortKey,

        /// asc or desc
        #[arg(long, default_value = "asc")]
        direction: SortDirection,
    },

    /// Recompute scores, then print the listing for every sort key
    Demo {
        #[command(flatten)]
        app: AppArgs,
    },
}
