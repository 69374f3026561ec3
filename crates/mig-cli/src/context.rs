//! Runtime context for a deploy: config plus CLI overrides, resolved once.

use anyhow::{Context, Result};
use mig_core::{CatalogOptions, Config, StateStore};
use mig_tool::WranglerTool;
use std::path::PathBuf;

use crate::cli::Cli;

/// Everything a deploy needs, with paths made absolute against the project
#[derive(Debug, Clone)]
pub(crate) struct DeployContext {
    /// Remote database name
    pub database: String,

    pub migrations_dir: PathBuf,

    pub state_file: PathBuf,

    /// JSON run results destination
    pub results_path: PathBuf,

    pub catalog: CatalogOptions,

    pub dry_run: bool,

    pub skip_create: bool,

    pub verbose: bool,

    /// Tool settings after CLI overrides
    pub tool: mig_core::ToolConfig,
}

impl DeployContext {
    /// Resolve the context from parsed CLI arguments
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let root = &cli.project_dir;

        let mut config = match &cli.config {
            Some(path) => Config::load(path).context("Failed to load configuration file")?,
            None => Config::load_from_dir(root).context("Failed to load project configuration")?,
        };

        if let Some(database) = &cli.database {
            config.database = database.clone();
        }
        if let Some(dir) = &cli.migrations_dir {
            config.migrations_dir = dir.clone();
        }
        if let Some(state_file) = &cli.state_file {
            config.state_file = state_file.clone();
        }
        if let Some(timeout) = cli.timeout {
            config.tool.timeout_secs = timeout;
        }
        config.validate().context("Invalid configuration")?;

        Ok(Self {
            database: config.database.clone(),
            migrations_dir: config.migrations_dir_absolute(root),
            state_file: config.state_file_absolute(root),
            results_path: config.results_path_absolute(root),
            catalog: config.catalog_options(),
            dry_run: cli.dry_run,
            skip_create: cli.skip_create,
            verbose: cli.verbose,
            tool: config.tool,
        })
    }

    pub fn state_store(&self) -> StateStore {
        StateStore::new(&self.state_file)
    }

    /// Build the wrangler backend described by the tool config
    pub fn wrangler(&self) -> WranglerTool {
        WranglerTool::new(
            self.tool.program.clone(),
            self.tool.args.clone(),
            self.tool.timeout_secs,
        )
        .with_remote(self.tool.remote)
    }

    /// Print verbose output if enabled
    pub fn verbose(&self, msg: &str) {
        if self.verbose {
            eprintln!("[verbose] {}", msg);
        }
    }
}

#[cfg(test)]
#[path = "context_test.rs"]
mod tests;
