//! Database tool trait definition

use crate::error::ToolResult;
use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;

/// Captured result of one tool invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    /// Exit code, or `-1` when the process was terminated by a signal
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Diagnostic text for a failed invocation: stderr, or stdout when the
    /// tool reported its error there instead.
    pub fn diagnostics(&self) -> &str {
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            self.stdout.trim()
        } else {
            stderr
        }
    }
}

/// A database as reported by the tool's list command
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteDatabase {
    pub name: String,
}

/// Command-line tool that talks to the hosted database service.
///
/// Every method spawns at most one process and waits for it; callers invoke
/// them one at a time.
#[async_trait]
pub trait DatabaseTool: Send + Sync {
    /// Check the tool runs, returning its reported version
    async fn probe_version(&self) -> ToolResult<String>;

    /// List databases visible to the configured account
    async fn list_databases(&self) -> ToolResult<Vec<RemoteDatabase>>;

    /// Create a database by name
    async fn create_database(&self, name: &str) -> ToolResult<()>;

    /// Execute a SQL file against a database.
    ///
    /// A non-zero exit is returned as `Ok` with `success == false` so the
    /// caller can keep the captured output. `Err` is reserved for failures
    /// to run the tool at all.
    async fn execute_file(&self, database: &str, file: &Path) -> ToolResult<CommandOutput>;

    /// Tool name for logging
    fn tool_name(&self) -> &'static str;
}
