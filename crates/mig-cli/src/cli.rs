//! CLI argument definitions using clap derive API

use clap::Parser;
use std::path::PathBuf;

/// mig - apply pending SQL migrations to a hosted database through its CLI tool
#[derive(Parser, Debug, Clone)]
#[command(name = "mig")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Database to deploy to (default: `database` from mig.yml, else "minidebet")
    pub database: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, default_value = ".")]
    pub project_dir: PathBuf,

    /// Override config file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the migrations directory (relative to the project directory)
    #[arg(long)]
    pub migrations_dir: Option<String>,

    /// Override the deployed-state file (relative to the project directory)
    #[arg(long)]
    pub state_file: Option<String>,

    /// Per-invocation timeout for the database tool in seconds (0 disables)
    #[arg(long, env = "MIG_TIMEOUT_SECS")]
    pub timeout: Option<u64>,

    /// Show pending migrations without creating the database or applying anything
    #[arg(long)]
    pub dry_run: bool,

    /// Do not list or create the database before applying migrations
    #[arg(long)]
    pub skip_create: bool,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
