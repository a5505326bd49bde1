//! Catalog harvester CLI
//!
//! Walks the app catalog and keeps every entry the store reports as a game.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use harvester::{
    error::Result,
    models::Config,
    pipeline,
    services::StoreApi,
    storage::{LocalStorage, Progress},
};

/// Harvester - keep the catalog entries of one type
#[derive(Parser, Debug)]
#[command(name = "harvester", version, about = "Filters an app catalog by item type")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "harvester.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch the catalog and classify every entry not yet saved
    Run {
        /// Stop after this many processed entries
        #[arg(long)]
        limit: Option<usize>,

        /// Progress file (default: storage.progress_file from the config)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate the configuration
    Validate,

    /// Show the progress file status
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn load_config(path: &Path) -> Config {
    if path.exists() {
        log::info!("Loading configuration from {}", path.display());
        Config::load_or_default(path)
    } else {
        log::debug!("No config at {}, using defaults", path.display());
        Config::default()
    }
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = load_config(&cli.config);

    match cli.command {
        Command::Run { limit, output } => {
            if let Some(limit) = limit {
                config.harvest.max_processed = Some(limit);
            }
            if let Some(path) = output {
                config.storage.progress_file = path.display().to_string();
            }
            config.validate()?;

            let api = StoreApi::new(config.api.clone())?;
            let storage = LocalStorage::new(&config.storage.progress_file);

            let summary = pipeline::run_harvest(&config, &api, &api, &storage).await?;

            log::info!(
                "{} valid items written to {}",
                summary.total_accepted,
                storage.path().display()
            );
            log::debug!(
                "Run took {}s: {} processed, {} already saved, {} unnamed",
                (summary.finished_at - summary.started_at).num_seconds(),
                summary.processed,
                summary.already_seen,
                summary.unnamed
            );
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK");
        }

        Command::Info => {
            let storage = LocalStorage::new(&config.storage.progress_file);
            log::info!("Progress file: {}", storage.path().display());
            log::info!("Target type: {}", config.classifier.target_type);

            if storage.path().exists() {
                let progress = Progress::load(&storage).await;
                log::info!("Accepted items: {}", progress.len());
            } else {
                log::info!("No progress saved yet.");
            }
        }
    }

    Ok(())
}
