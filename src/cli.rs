use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// File-backed task tracker.
/// Storage defaults to ./tasks.json, $TASKMGR_DB, or a path passed via --db.
#[derive(Parser)]
#[command(name = "taskmgr", version, about = "Local task tracking CLI")]
pub struct Cli {
    /// Path to the JSON data file.
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}
