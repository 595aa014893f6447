//! Invoice lottery CLI
//!
//! Refreshes a local JSON database of lottery drawings from the results feed.
//! Meant to run from cron; an unchanged feed leaves the database untouched.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use invoice_lottery::{
    error::{AppError, Result},
    models::Config,
    pipeline::{self, UpdateOptions, UpdateOutcome},
    services::FeedClient,
    storage::LocalStorage,
};

/// Uniform-invoice lottery results updater
#[derive(Parser, Debug)]
#[command(
    name = "invoice-lottery",
    version,
    about = "Keeps a JSON database of uniform-invoice lottery drawings"
)]
struct Cli {
    /// JSON database file (created if missing)
    #[arg(required_unless_present = "validate")]
    database_file: Option<PathBuf>,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the feed URL
    #[arg(long)]
    feed_url: Option<String>,

    /// Ignore the cached Last-Modified token and always rewrite
    #[arg(long)]
    force: bool,

    /// Parse the feed but do not write the database
    #[arg(long)]
    dry_run: bool,

    /// Validate configuration and exit
    #[arg(long)]
    validate: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Initialize logging from the verbosity flag or configured level.
fn init_logging(level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let (config, config_error) = match &cli.config {
        Some(path) => match Config::load(path) {
            Ok(config) => (config, None),
            Err(e) => (Config::default(), Some((path.clone(), e))),
        },
        None => (Config::default(), None),
    };

    init_logging(if cli.verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    });

    if let Some((path, e)) = config_error {
        log::warn!(
            "Config load failed from {}: {}. Using defaults.",
            path.display(),
            e
        );
    }

    match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e @ AppError::CacheCorrupt { .. }) => {
            println!("{e}");
            ExitCode::from(e.exit_code())
        }
        Err(e) => {
            log::error!("{e}");
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(cli: Cli, mut config: Config) -> Result<()> {
    if let Some(url) = cli.feed_url {
        config.feed.url = url;
    }

    if cli.validate {
        return pipeline::run_validate(&config);
    }
    config.validate()?;

    let database_file = cli
        .database_file
        .ok_or_else(|| AppError::config("database_file is required"))?;

    let feed = FeedClient::new(&config.feed)?;
    let store = LocalStorage::new(&database_file).with_pretty(config.storage.pretty);
    let options = UpdateOptions {
        force: cli.force,
        dry_run: cli.dry_run,
    };

    log::debug!("Feed: {}", feed.url());
    log::debug!("Database: {}", database_file.display());

    match pipeline::run_update(&feed, &store, options).await? {
        UpdateOutcome::Unchanged { .. } => {}
        UpdateOutcome::Updated { document } => log::info!(
            "Saved {} drawings to {}",
            document.drawings.len(),
            database_file.display()
        ),
        UpdateOutcome::DryRun { document } => log::info!(
            "Would save {} drawings to {}",
            document.drawings.len(),
            database_file.display()
        ),
    }

    Ok(())
}
