//! Homework watcher CLI
//!
//! Command-line entry point for the homework review status watcher.

use std::path::PathBuf;

use clap::Parser;
use homework_watcher::{load_config, Config, Credentials, WatcherBuilder};
use tracing::Level;

#[derive(Parser)]
#[command(name = "homework-watcher")]
#[command(about = "Relays homework review status changes to a Telegram chat")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Poll for changes since this UNIX timestamp instead of now
    #[arg(long)]
    from_date: Option<i64>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: Level,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .init();

    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!("Loaded environment from {:?}", path),
        Err(e) if e.not_found() => tracing::debug!("No .env file found"),
        Err(e) => tracing::warn!("Failed to load .env file: {}", e),
    }

    tracing::debug!(
        "Parsed command line arguments: config={:?}, from_date={:?}, log_level={:?}",
        args.config,
        args.from_date,
        args.log_level
    );

    let config = if let Some(config_path) = &args.config {
        tracing::debug!("Loading configuration from {:?}", config_path);
        load_config(config_path)?
    } else {
        tracing::debug!("Using default configuration");
        Config::default()
    };

    let credentials = match Credentials::from_env() {
        Ok(credentials) => credentials,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Starting homework watcher");
    tracing::debug!(
        "Endpoint: {}, retry period: {}s, homeworks: {:?}",
        config.api.endpoint,
        config.polling.retry_period_seconds,
        config.polling.homeworks
    );

    let mut builder = WatcherBuilder::new(config, credentials);
    if let Some(from_date) = args.from_date {
        builder = builder.with_initial_cursor(from_date);
    }
    builder.build()?.start().await?;

    Ok(())
}
