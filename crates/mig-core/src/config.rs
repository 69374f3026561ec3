//! Configuration types and parsing for mig.yml

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file names searched in the project directory, in order.
pub const CONFIG_FILE_NAMES: [&str; 2] = ["mig.yml", "mig.yaml"];

/// Database name used when neither the CLI nor the config names one.
pub const DEFAULT_DATABASE: &str = "minidebet";

/// Project configuration from mig.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Remote database that migrations are applied to
    #[serde(default = "default_database")]
    pub database: String,

    /// Directory containing migration SQL files
    #[serde(default = "default_migrations_dir")]
    pub migrations_dir: String,

    /// File recording which migrations have been applied
    #[serde(default = "default_state_file")]
    pub state_file: String,

    /// Where the JSON run results are written after a deploy
    #[serde(default = "default_results_path")]
    pub results_path: String,

    /// File name suffix that marks a migration file
    #[serde(default = "default_migration_extension")]
    pub migration_extension: String,

    /// File name suffix that marks a rollback file (never applied)
    #[serde(default = "default_rollback_suffix")]
    pub rollback_suffix: String,

    /// External database tool invocation
    #[serde(default)]
    pub tool: ToolConfig,
}

/// How the external database tool is invoked
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolConfig {
    /// Executable to spawn
    #[serde(default = "default_tool_program")]
    pub program: String,

    /// Leading arguments placed before every subcommand
    #[serde(default = "default_tool_args")]
    pub args: Vec<String>,

    /// Per-invocation timeout in seconds; `0` disables the timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Target the remote database instead of the local development copy
    #[serde(default)]
    pub remote: bool,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            program: default_tool_program(),
            args: default_tool_args(),
            timeout_secs: default_timeout_secs(),
            remote: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            migrations_dir: default_migrations_dir(),
            state_file: default_state_file(),
            results_path: default_results_path(),
            migration_extension: default_migration_extension(),
            rollback_suffix: default_rollback_suffix(),
            tool: ToolConfig::default(),
        }
    }
}

fn default_database() -> String {
    DEFAULT_DATABASE.to_string()
}

fn default_migrations_dir() -> String {
    "backend/migrations".to_string()
}

fn default_state_file() -> String {
    ".deployed_migrations".to_string()
}

fn default_results_path() -> String {
    "target/mig_results.json".to_string()
}

fn default_migration_extension() -> String {
    ".sql".to_string()
}

fn default_rollback_suffix() -> String {
    ".down.sql".to_string()
}

fn default_tool_program() -> String {
    "npx".to_string()
}

fn default_tool_args() -> Vec<String> {
    vec!["wrangler".to_string()]
}

fn default_timeout_secs() -> u64 {
    300
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config =
            serde_yaml::from_str(&content).map_err(|e| CoreError::ConfigParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a project directory.
    ///
    /// Looks for mig.yml or mig.yaml and falls back to the defaults when
    /// neither exists; a present but broken file is still an error.
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        match CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|p| p.exists())
        {
            Some(path) => Self::load(&path),
            None => {
                log::debug!("No mig.yml in {}, using defaults", dir.display());
                Ok(Self::default())
            }
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> CoreResult<()> {
        if self.database.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "database name cannot be empty".to_string(),
            });
        }

        if self.migration_extension.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "migration_extension cannot be empty".to_string(),
            });
        }

        if !self.rollback_suffix.ends_with(&self.migration_extension) {
            return Err(CoreError::ConfigInvalid {
                message: format!(
                    "rollback_suffix '{}' must end with migration_extension '{}'",
                    self.rollback_suffix, self.migration_extension
                ),
            });
        }

        if self.tool.program.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "tool.program cannot be empty".to_string(),
            });
        }

        Ok(())
    }

    pub fn migrations_dir_absolute(&self, root: &Path) -> PathBuf {
        root.join(&self.migrations_dir)
    }

    pub fn state_file_absolute(&self, root: &Path) -> PathBuf {
        root.join(&self.state_file)
    }

    pub fn results_path_absolute(&self, root: &Path) -> PathBuf {
        root.join(&self.results_path)
    }

    /// Catalog filtering options derived from this config
    pub fn catalog_options(&self) -> crate::migration::CatalogOptions {
        crate::migration::CatalogOptions {
            extension: self.migration_extension.clone(),
            rollback_suffix: self.rollback_suffix.clone(),
        }
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
