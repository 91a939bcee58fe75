//! `enforcelog` command-line entry point.
//!
//! # Responsibility
//! - Load configuration, initialize logging and open the record store.
//! - Dispatch entry and report commands to core services.

mod cli;
mod commands;
mod output;

use clap::Parser;
use cli::{Cli, Commands};
use enforcelog_core::db::open_db_with_retry;
use enforcelog_core::report::cache::SnapshotCache;
use enforcelog_core::{init_logging, AppConfig};
use log::info;

fn main() {
    if let Err(error) = run(Cli::parse()) {
        eprintln!("enforcelog error: {error:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(db) = cli.db {
        config.store.path = db;
    }
    init_logging(&config.logging.level, config.logging.dir.as_deref())
        .map_err(anyhow::Error::msg)?;
    let roster = config.roster()?;

    match cli.command {
        Commands::Taxonomy => return commands::catalog::taxonomy(),
        Commands::Roster => return commands::catalog::roster(&roster),
        Commands::Entry { .. } | Commands::Report { .. } => {}
    }

    let mut conn = open_db_with_retry(&config.store.path, &config.retry_policy())?;
    info!(
        "event=cli_start module=cli status=ok version={} store={}",
        enforcelog_core::core_version(),
        config.store.path.display()
    );

    match cli.command {
        Commands::Entry { action } => commands::entry::handle(action, &mut conn, roster),
        Commands::Report { action } => {
            let cache = SnapshotCache::new(config.snapshot_ttl());
            commands::report::handle(action, &mut conn, roster, cache)
        }
        Commands::Taxonomy | Commands::Roster => Ok(()),
    }
}
