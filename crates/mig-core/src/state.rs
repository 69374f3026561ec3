//! Deployed-migration state tracking
//!
//! The state file is a JSON array of migration ids in the order they were
//! applied. It is read once at the start of a deploy and written once at the
//! end.

use crate::error::{CoreError, CoreResult, Loaded};
use crate::migration_id::MigrationId;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Ordered list of migration ids that have been applied.
///
/// Append-only. Duplicates are kept as found, since the file is human
/// editable and is not validated against the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeployedSet(Vec<MigrationId>);

impl DeployedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.iter().any(|m| m.as_str() == id)
    }

    /// Record a newly applied migration
    pub fn push(&mut self, id: MigrationId) {
        self.0.push(id);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MigrationId> {
        self.0.iter()
    }
}

impl FromIterator<MigrationId> for DeployedSet {
    fn from_iter<I: IntoIterator<Item = MigrationId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Reads and writes the deployed-state file
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the deployed set.
    ///
    /// An absent file is an empty set. A file that cannot be read or does not
    /// hold a JSON array of non-empty strings is also treated as empty, with a
    /// [`CoreError::StateCorrupt`] warning: every migration will look pending.
    pub fn load(&self) -> Loaded<DeployedSet> {
        if !self.path.exists() {
            return Loaded::ok(DeployedSet::new());
        }

        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) => return Loaded::degraded(DeployedSet::new(), self.corrupt(e.to_string())),
        };

        match serde_json::from_str::<DeployedSet>(&content) {
            Ok(set) => Loaded::ok(set),
            Err(e) => Loaded::degraded(DeployedSet::new(), self.corrupt(e.to_string())),
        }
    }

    /// Overwrite the state file with `set`.
    ///
    /// Writes a sibling temp file and renames it over the target so a failed
    /// write never truncates the previous state.
    pub fn save(&self, set: &DeployedSet) -> CoreResult<()> {
        self.write(set).map_err(|e| CoreError::StatePersistFailure {
            path: self.path.display().to_string(),
            details: e.to_string(),
        })
    }

    fn write(&self, set: &DeployedSet) -> CoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(set)?;
        let temp_path = self.temp_path();
        fs::write(&temp_path, json)?;
        if let Err(e) = fs::rename(&temp_path, &self.path) {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn corrupt(&self, details: String) -> CoreError {
        CoreError::StateCorrupt {
            path: self.path.display().to_string(),
            details,
        }
    }
}

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
