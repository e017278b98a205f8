mod commands;
mod geocoder;
mod render;
mod utils;

use std::path::PathBuf;

use anyhow::Result;
use calview_core::config::CalViewConfig;
use calview_core::geo::Coordinates;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "calview")]
#[command(about = "Expand a class schedule into dated, geocoded occurrences")]
struct Cli {
    /// Config file (defaults to ~/.config/calview/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse an .ics file and print every class meeting
    Parse {
        file: PathBuf,

        /// School or campus the schedule belongs to (e.g. "University of Virginia")
        #[arg(short, long, default_value = "")]
        context: String,

        /// Print JSON records instead of a table
        #[arg(long)]
        json: bool,

        /// Skip geocoding; all coordinates will be empty
        #[arg(long)]
        offline: bool,
    },
    /// Show how location strings are cleaned before geocoding
    Normalize {
        #[arg(required = true)]
        locations: Vec<String>,
    },
    /// Geocode a single address
    Geocode {
        address: String,

        /// Bias the lookup towards this point (LAT,LNG)
        #[arg(long)]
        near: Option<Coordinates>,
    },
    /// List known schools
    Schools,
    /// Manage the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write a commented default config file
    Init,
    /// Print the config file path
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let explicit = cli.config;
    let load_config = || -> Result<CalViewConfig> {
        Ok(CalViewConfig::load_from(&resolve_config_path(explicit.clone())?)?)
    };

    match cli.command {
        Commands::Parse {
            file,
            context,
            json,
            offline,
        } => commands::parse::run(&load_config()?, &file, &context, json, offline).await,
        Commands::Normalize { locations } => commands::normalize::run(&locations),
        Commands::Geocode { address, near } => {
            commands::geocode::run(&load_config()?, &address, near).await
        }
        Commands::Schools => commands::schools::run(&load_config()?),
        Commands::Config { action } => {
            let config_path = resolve_config_path(explicit.clone())?;
            match action {
                ConfigAction::Init => commands::config::init(&config_path),
                ConfigAction::Path => commands::config::path(&config_path),
            }
        }
    }
}

/// `--config` wins; otherwise the platform config directory.
fn resolve_config_path(explicit: Option<PathBuf>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path),
        None => Ok(CalViewConfig::config_path()?),
    }
}

/// Logs go to stderr so `--json` output stays clean.
fn init_logging(verbose: bool) -> Result<()> {
    let default_filter = if verbose { "debug" } else { "warn" };

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to set up logging: {}", e))?;

    Ok(())
}
