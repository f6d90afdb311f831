//! # taskmgr - local task tracking CLI
//!
//! Tasks are kept in a single JSON file (`./tasks.json` unless `--db` or
//! `TASKMGR_DB` say otherwise) and carry a priority, status, tags, an optional
//! project and an optional due date.
//!
//! ```bash
//! taskmgr add "Finish report" --desc "Q3 numbers" --priority high --tag work,urgent --project Finance --due tomorrow
//! taskmgr list --overdue
//! taskmgr search groceries --in title
//! taskmgr update 1 --status in_progress --due +7d
//! taskmgr bulk-update 1,2,3 completed
//! taskmgr stats
//! ```
//!
//! Set `TASKMGR_LOG=debug` (or pass `-vv`) to see what the engine is doing.

use anyhow::{Context, Result};
use clap::Parser;

use taskmgr::config::Config;
use taskmgr::{logging, JsonFileStorage, TaskStore};

pub mod cli;
pub mod cmd;
pub mod display;

use cli::Cli;
use cmd::*;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::resolve(cli.db, cli.verbose);
    logging::init(&config.log_filter);

    // Completions don't need a data file.
    if let Commands::Completions { shell } = cli.command {
        cmd_completions(shell);
        return Ok(());
    }

    let storage = JsonFileStorage::new(&config.data_file);
    let mut store = TaskStore::open(storage)
        .with_context(|| format!("failed to open task data at {}", config.data_file.display()))?;
    run(&mut store, cli.command)
}
