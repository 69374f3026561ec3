//! In-process [`DatabaseTool`] double for driving deploys in tests.

use crate::error::{ToolError, ToolResult};
use crate::traits::{CommandOutput, DatabaseTool, RemoteDatabase};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// One recorded tool invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolCall {
    ProbeVersion,
    ListDatabases,
    CreateDatabase(String),
    /// Database name, the path handed to the tool, and the SQL it held
    ExecuteFile {
        database: String,
        path: PathBuf,
        sql: String,
    },
}

/// How the scripted list command misbehaves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListFailure {
    /// Exits non-zero
    Exit,
    /// Exits zero but prints something that is not a database list
    Garbled,
}

/// Scripted tool: answers from fixed data and records every call.
///
/// `execute_file` reads the file it is given, so callers can assert on the
/// SQL that reached the tool even though it was passed via a scratch path.
#[derive(Debug)]
pub struct ScriptedTool {
    probe_ok: bool,
    databases: Mutex<Vec<String>>,
    list_failure: Option<ListFailure>,
    create_fails: bool,
    fail_markers: Vec<String>,
    calls: Mutex<Vec<ToolCall>>,
}

impl Default for ScriptedTool {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedTool {
    /// A tool that probes fine, knows no databases, and applies everything
    pub fn new() -> Self {
        Self {
            probe_ok: true,
            databases: Mutex::new(Vec::new()),
            list_failure: None,
            create_fails: false,
            fail_markers: Vec::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn unavailable(mut self) -> Self {
        self.probe_ok = false;
        self
    }

    pub fn with_database(self, name: &str) -> Self {
        self.lock_databases().push(name.to_string());
        self
    }

    pub fn failing_list(mut self) -> Self {
        self.list_failure = Some(ListFailure::Exit);
        self
    }

    pub fn garbled_list(mut self) -> Self {
        self.list_failure = Some(ListFailure::Garbled);
        self
    }

    pub fn failing_create(mut self) -> Self {
        self.create_fails = true;
        self
    }

    /// Fail any executed file whose SQL contains `marker`
    pub fn fail_when_sql_contains(mut self, marker: &str) -> Self {
        self.fail_markers.push(marker.to_string());
        self
    }

    pub fn calls(&self) -> Vec<ToolCall> {
        self.lock_calls().clone()
    }

    /// SQL of every `execute_file` call, in order
    pub fn executed_sql(&self) -> Vec<String> {
        self.lock_calls()
            .iter()
            .filter_map(|c| match c {
                ToolCall::ExecuteFile { sql, .. } => Some(sql.clone()),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: ToolCall) {
        self.lock_calls().push(call);
    }

    fn lock_calls(&self) -> std::sync::MutexGuard<'_, Vec<ToolCall>> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_databases(&self) -> std::sync::MutexGuard<'_, Vec<String>> {
        self.databases.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl DatabaseTool for ScriptedTool {
    async fn probe_version(&self) -> ToolResult<String> {
        self.record(ToolCall::ProbeVersion);
        if self.probe_ok {
            Ok("scripted 1.0.0".to_string())
        } else {
            Err(ToolError::Unavailable("scripted tool is unavailable".to_string()))
        }
    }

    async fn list_databases(&self) -> ToolResult<Vec<RemoteDatabase>> {
        self.record(ToolCall::ListDatabases);
        match self.list_failure {
            Some(ListFailure::Exit) => Err(ToolError::CommandFailed {
                command: "scripted d1 list --json".to_string(),
                exit_code: 1,
                stderr: "not authenticated".to_string(),
            }),
            Some(ListFailure::Garbled) => Err(ToolError::UnexpectedOutput {
                command: "scripted d1 list --json".to_string(),
                details: "expected value at line 1 column 1".to_string(),
            }),
            None => Ok(self
                .lock_databases()
                .iter()
                .map(|name| RemoteDatabase { name: name.clone() })
                .collect()),
        }
    }

    async fn create_database(&self, name: &str) -> ToolResult<()> {
        self.record(ToolCall::CreateDatabase(name.to_string()));
        if self.create_fails {
            return Err(ToolError::CommandFailed {
                command: format!("scripted d1 create {name}"),
                exit_code: 1,
                stderr: "quota exceeded".to_string(),
            });
        }
        self.lock_databases().push(name.to_string());
        Ok(())
    }

    async fn execute_file(&self, database: &str, file: &Path) -> ToolResult<CommandOutput> {
        let sql = std::fs::read_to_string(file).unwrap_or_default();
        let failed = self.fail_markers.iter().any(|m| sql.contains(m.as_str()));
        self.record(ToolCall::ExecuteFile {
            database: database.to_string(),
            path: file.to_path_buf(),
            sql,
        });

        Ok(CommandOutput {
            success: !failed,
            exit_code: if failed { 1 } else { 0 },
            stdout: String::new(),
            stderr: if failed {
                "scripted failure".to_string()
            } else {
                String::new()
            },
        })
    }

    fn tool_name(&self) -> &'static str {
        "scripted"
    }
}
