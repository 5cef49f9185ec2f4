//! Techno Radar CLI
//!
//! Local execution entry point, meant to be invoked by cron or any other
//! external scheduler that guarantees non-overlapping runs.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use technoradar::{
    error::{AppError, Result},
    models::Config,
    pipeline::{self, DateWindow},
    services::ListingsClient,
    storage::SqliteStore,
};

/// Techno Radar - event listings scraper
#[derive(Parser, Debug)]
#[command(
    name = "technoradar",
    version,
    about = "Scrapes techno event listings into a local events database"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one ingestion cycle over the configured window
    Ingest {
        /// Override the fetch window length in days
        #[arg(long)]
        days: Option<u32>,
    },

    /// List events not yet dispatched by the notifier
    Pending,

    /// List upcoming events
    Upcoming {
        /// Maximum number of events to show
        #[arg(long, default_value_t = 10)]
        limit: i64,
    },

    /// Validate the configuration file
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load_or_default(&cli.config);

    match cli.command {
        Command::Ingest { days } => {
            config.validate()?;

            let store = SqliteStore::connect(&config.database.url).await?;
            let client = ListingsClient::new(Arc::new(config.upstream.clone()))?;
            let window = DateWindow::days_from_today(days.unwrap_or(config.ingest.window_days));

            let summary =
                pipeline::run_ingest(&client, &store, &config.upstream, window).await;

            if summary.fetch_failed() {
                // zero events in the window is a normal outcome; this is not
                return Err(AppError::upstream(
                    "no listings retrieved and a terminal fetch error was observed",
                ));
            }
        }

        Command::Pending => {
            let store = SqliteStore::connect(&config.database.url).await?;
            let pending = store.unnotified().await?;

            log::info!("{} events pending notification", pending.len());
            for event in &pending {
                println!(
                    "{}  {}  @ {}  [{}]",
                    event.event_date, event.event_name, event.club_name, event.source_link
                );
            }
        }

        Command::Upcoming { limit } => {
            let store = SqliteStore::connect(&config.database.url).await?;
            let today = chrono::Utc::now().date_naive();
            let page = store.upcoming(today, limit, 0).await?;

            log::info!("{} upcoming events, showing {}", page.total, page.events.len());
            for event in &page.events {
                println!(
                    "{} {}-{}  {}  @ {}  ({})",
                    event.event_date,
                    event.start_time,
                    event.end_time,
                    event.event_name,
                    event.club_name,
                    event.artists
                );
            }
        }

        Command::Validate => {
            log::info!("Validating configuration...");
            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK");
        }
    }

    Ok(())
}
