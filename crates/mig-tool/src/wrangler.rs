//! Cloudflare D1 through the `wrangler` CLI.

use crate::command::CommandRunner;
use crate::error::{ToolError, ToolResult};
use crate::traits::{CommandOutput, DatabaseTool, RemoteDatabase};
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::Path;

/// `wrangler d1 ...` backend
#[derive(Debug, Clone)]
pub struct WranglerTool {
    runner: CommandRunner,
    remote: bool,
}

impl WranglerTool {
    /// Invoke wrangler as `<program> <base_args> ...`, e.g. `npx wrangler`.
    pub fn new(program: impl Into<String>, base_args: Vec<String>, timeout_secs: u64) -> Self {
        Self {
            runner: CommandRunner::new(program, base_args, timeout_secs),
            remote: false,
        }
    }

    /// Pass `--remote` to `d1 execute` so SQL runs against the hosted database
    pub fn with_remote(mut self, remote: bool) -> Self {
        self.remote = remote;
        self
    }

    fn execute_args(&self, database: &str, file: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "d1".into(),
            "execute".into(),
            database.into(),
            "--file".into(),
            file.as_os_str().to_os_string(),
        ];
        if self.remote {
            args.push("--remote".into());
        }
        args
    }
}

/// Parse `d1 list --json` output.
///
/// Expects a JSON array of objects carrying at least a `name` field.
pub fn parse_database_list(stdout: &str) -> Result<Vec<RemoteDatabase>, String> {
    serde_json::from_str::<Vec<RemoteDatabase>>(stdout.trim()).map_err(|e| e.to_string())
}

#[async_trait]
impl DatabaseTool for WranglerTool {
    async fn probe_version(&self) -> ToolResult<String> {
        match self.runner.run(&["--version"]).await {
            Ok(output) if output.success => Ok(output.stdout.trim().to_string()),
            Ok(output) => Err(ToolError::Unavailable(format!(
                "`{}` exited with {}: {}",
                self.runner.describe(&["--version"]),
                output.exit_code,
                output.diagnostics()
            ))),
            Err(e) => Err(ToolError::Unavailable(e.to_string())),
        }
    }

    async fn list_databases(&self) -> ToolResult<Vec<RemoteDatabase>> {
        let args = ["d1", "list", "--json"];
        let output = self.runner.run_checked(&args).await?;
        parse_database_list(&output.stdout).map_err(|details| ToolError::UnexpectedOutput {
            command: self.runner.describe(&args),
            details,
        })
    }

    async fn create_database(&self, name: &str) -> ToolResult<()> {
        self.runner.run_checked(&["d1", "create", name]).await?;
        Ok(())
    }

    async fn execute_file(&self, database: &str, file: &Path) -> ToolResult<CommandOutput> {
        let args = self.execute_args(database, file);
        self.runner.run(args.as_slice()).await
    }

    fn tool_name(&self) -> &'static str {
        "wrangler"
    }
}

#[cfg(test)]
#[path = "wrangler_test.rs"]
mod tests;
