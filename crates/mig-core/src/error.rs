//! Error types for mig-core

use thiserror::Error;

/// Core error type for mig
#[derive(Error, Debug)]
pub enum CoreError {
    /// M001: Configuration file not found
    #[error("[M001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// M002: Failed to parse configuration file
    #[error("[M002] Failed to parse config {path}: {message}")]
    ConfigParseError { path: String, message: String },

    /// M003: Invalid configuration value
    #[error("[M003] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// M010: Migrations directory does not exist
    #[error("[M010] Migrations directory not found: {path}")]
    DirectoryNotFound { path: String },

    /// M011: Deployed-state file exists but could not be read as a list of ids
    #[error("[M011] Could not read deployed migrations file {path}: {details}")]
    StateCorrupt { path: String, details: String },

    /// M012: Deployed-state file could not be written
    #[error("[M012] Failed to save deployed migrations to {path}: {details}")]
    StatePersistFailure { path: String, details: String },

    /// M014: IO error
    #[error("[M014] IO error: {0}")]
    Io(#[from] std::io::Error),

    /// M016: IO error with file path context
    #[error("[M016] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;

/// A value produced by a loader that may have degraded to a fallback.
///
/// `warning` carries the recoverable condition that forced the fallback, so
/// the caller can surface it without treating it as fatal.
#[derive(Debug)]
pub struct Loaded<T> {
    pub value: T,
    pub warning: Option<CoreError>,
}

impl<T> Loaded<T> {
    /// A clean load with no warning attached.
    pub fn ok(value: T) -> Self {
        Self {
            value,
            warning: None,
        }
    }

    /// A fallback value plus the condition that caused it.
    pub fn degraded(value: T, warning: CoreError) -> Self {
        Self {
            value,
            warning: Some(warning),
        }
    }

    pub fn into_parts(self) -> (T, Option<CoreError>) {
        (self.value, self.warning)
    }
}
