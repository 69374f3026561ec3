//! Error types for mig-tool

use thiserror::Error;

/// External database tool errors
#[derive(Error, Debug)]
pub enum ToolError {
    /// Tool could not be found or its version probe failed (T001)
    #[error("[T001] Database tool unavailable: {0}")]
    Unavailable(String),

    /// Spawning the tool process failed (T002)
    #[error("[T002] Failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    /// Tool did not exit within the configured timeout (T003)
    #[error("[T003] `{command}` timed out after {timeout_secs}s")]
    Timeout { command: String, timeout_secs: u64 },

    /// Tool exited with a non-zero status (T004)
    #[error("[T004] `{command}` failed (exit {exit_code}): {stderr}")]
    CommandFailed {
        command: String,
        exit_code: i32,
        stderr: String,
    },

    /// Tool output could not be interpreted (T005)
    #[error("[T005] Unexpected output from `{command}`: {details}")]
    UnexpectedOutput { command: String, details: String },
}

/// Result type alias for ToolError
pub type ToolResult<T> = Result<T, ToolError>;
