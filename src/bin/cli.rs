//! Notice board crawler CLI
//!
//! Local execution entry point. Prints the new notices of every section as
//! JSON on stdout; logs go to stderr.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use noticeboard::{
    error::Result,
    models::Config,
    pipeline,
    storage::{LocalStore, NoticeStore},
};

/// noticeboard - Notice Board Crawler
#[derive(Parser, Debug)]
#[command(name = "noticeboard", version, about = "Notice board crawler")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, env = "NOTICEBOARD_CONFIG", default_value = "storage/config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl every section and print the new notices (default)
    Crawl,

    /// Validate the configuration file
    Validate,

    /// Show how many notices are stored per section
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool, level: &str) {
    let level = if verbose { "debug" } else { level };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load_or_default(&cli.config);
    let level = config
        .as_ref()
        .map(|c| c.logging.level.clone())
        .unwrap_or_else(|_| "info".to_string());
    init_logging(cli.verbose, &level);

    let config = config.inspect_err(|e| {
        log::error!("Config load failed from {}: {}", cli.config.display(), e);
    })?;

    match cli.command.unwrap_or(Command::Crawl) {
        Command::Crawl => {
            log::info!("Notice board crawler starting...");
            let new_notices = pipeline::scrape_with(&config).await?;
            println!("{}", serde_json::to_string_pretty(&new_notices)?);
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK ({} sections)", config.sections.len());
        }

        Command::Info => {
            log::info!("Board: {}", config.base_url);
            log::info!("Store directory: {}", config.store.dir.display());

            let store = LocalStore::new(&config.store.dir);
            for section in config.sections() {
                let stored = store.load(&section.id).await?;
                log::info!("{} ({}): {} stored notices", section.id, section.path, stored.len());
            }
        }
    }

    Ok(())
}
