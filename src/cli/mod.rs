//! CLI command handlers
//!
//! Each subcommand has its own module with handler functions.

pub mod config;
pub mod interactive;
pub mod locate;
pub mod reverse;
pub mod search;

use crate::config::Config;
use crate::error::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Location search and geocoding for pollution reports
#[derive(Parser)]
#[command(name = "civic-locate")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search for places by name
    Search(search::SearchArgs),

    /// Look up the address at a coordinate pair
    Reverse(reverse::ReverseArgs),

    /// Determine the current location
    Locate(locate::LocateArgs),

    /// Type queries line by line and pick a result
    Interactive(interactive::InteractiveArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

/// Run the CLI
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Search(args) => search::run(args, &load_config(config_path)?).await,
        Commands::Reverse(args) => reverse::run(args, &load_config(config_path)?).await,
        Commands::Locate(args) => locate::run(args, &load_config(config_path)?).await,
        Commands::Interactive(args) => interactive::run(args, &load_config(config_path)?).await,
        Commands::Config(args) => config::run(args, config_path),
    }
}

/// Load config from an explicit path or the default location
pub(crate) fn load_config(path: Option<&std::path::Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}
