//! Apply a single migration through the database tool.

use mig_core::MigrationFile;
use mig_tool::DatabaseTool;
use serde::Serialize;
use std::io::Write;
use std::time::Instant;

use crate::commands::common::RunStatus;

/// Outcome of one apply attempt
#[derive(Debug, Clone, Serialize)]
pub(crate) struct ExecutionResult {
    pub(crate) migration: String,
    pub(crate) file: String,
    pub(crate) status: RunStatus,
    pub(crate) duration_secs: f64,
    pub(crate) error: Option<String>,
}

impl ExecutionResult {
    pub(crate) fn is_success(&self) -> bool {
        self.status == RunStatus::Success
    }

    fn finish(migration: &MigrationFile, started: Instant, error: Option<String>) -> Self {
        Self {
            migration: migration.id.to_string(),
            file: migration.name.clone(),
            status: if error.is_none() {
                RunStatus::Success
            } else {
                RunStatus::Error
            },
            duration_secs: started.elapsed().as_secs_f64(),
            error,
        }
    }
}

/// Copy the SQL into a fresh scratch file, run it, and remove the copy.
///
/// The tool receives the scratch path, never the original file. Removing the
/// scratch file is best effort.
pub(crate) async fn apply_migration(
    tool: &dyn DatabaseTool,
    database: &str,
    migration: &MigrationFile,
) -> ExecutionResult {
    let started = Instant::now();

    let sql = match migration.read_sql() {
        Ok(sql) => sql,
        Err(e) => return ExecutionResult::finish(migration, started, Some(e.to_string())),
    };

    let scratch = match write_scratch(&sql) {
        Ok(path) => path,
        Err(e) => {
            return ExecutionResult::finish(
                migration,
                started,
                Some(format!("Failed to write scratch file: {e}")),
            )
        }
    };

    let outcome = tool.execute_file(database, &scratch).await;

    let scratch_display = scratch.display().to_string();
    if let Err(e) = scratch.close() {
        log::warn!("Could not remove scratch file {}: {}", scratch_display, e);
    }

    let error = match outcome {
        Ok(output) if output.success => None,
        Ok(output) => Some(format!(
            "{} exited with {}: {}",
            tool.tool_name(),
            output.exit_code,
            output.diagnostics()
        )),
        Err(e) => Some(e.to_string()),
    };
    ExecutionResult::finish(migration, started, error)
}

/// Write `sql` to a uniquely named `.sql` temp file and close the handle.
fn write_scratch(sql: &str) -> std::io::Result<tempfile::TempPath> {
    let mut file = tempfile::Builder::new()
        .prefix("mig-")
        .suffix(".sql")
        .tempfile()?;
    file.write_all(sql.as_bytes())?;
    file.flush()?;
    Ok(file.into_temp_path())
}

#[cfg(test)]
#[path = "apply_test.rs"]
mod tests;
