//! Migration catalog discovery
//!
//! A catalog is the set of forward migration files found directly inside the
//! migrations directory, sorted by file name. Rollback companions
//! (`*.down.sql` by default) are never part of it.

use crate::error::{CoreError, CoreResult, Loaded};
use crate::migration_id::MigrationId;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// File name filters applied when scanning the migrations directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogOptions {
    /// Suffix a file must carry to be a migration (e.g. `.sql`)
    pub extension: String,
    /// Suffix that marks a rollback file (e.g. `.down.sql`)
    pub rollback_suffix: String,
}

impl Default for CatalogOptions {
    fn default() -> Self {
        Self {
            extension: ".sql".to_string(),
            rollback_suffix: ".down.sql".to_string(),
        }
    }
}

impl CatalogOptions {
    /// Derive the migration id for a file name, or `None` if the file is not
    /// a forward migration.
    pub fn migration_id(&self, file_name: &str) -> Option<MigrationId> {
        if file_name.ends_with(&self.rollback_suffix) {
            return None;
        }
        let stem = file_name.strip_suffix(&self.extension)?;
        MigrationId::try_new(stem)
    }
}

/// A forward migration discovered on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationFile {
    /// Identifier stored in the deployed-state file
    pub id: MigrationId,
    /// Path to the SQL file
    pub path: PathBuf,
    /// File name, used in progress output
    pub name: String,
}

impl MigrationFile {
    /// Read the migration's SQL text
    pub fn read_sql(&self) -> CoreResult<String> {
        std::fs::read_to_string(&self.path).map_err(|e| CoreError::IoWithPath {
            path: self.path.display().to_string(),
            source: e,
        })
    }
}

/// Discover forward migrations in `dir`, sorted by file name.
///
/// A missing directory yields an empty catalog with a
/// [`CoreError::DirectoryNotFound`] warning. Only the top level of `dir` is
/// scanned.
pub fn discover_migrations(
    dir: &Path,
    options: &CatalogOptions,
) -> CoreResult<Loaded<Vec<MigrationFile>>> {
    if !dir.is_dir() {
        return Ok(Loaded::degraded(
            Vec::new(),
            CoreError::DirectoryNotFound {
                path: dir.display().to_string(),
            },
        ));
    }

    let entries = std::fs::read_dir(dir).map_err(|e| CoreError::IoWithPath {
        path: dir.display().to_string(),
        source: e,
    })?;

    let mut migrations = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| CoreError::IoWithPath {
            path: dir.display().to_string(),
            source: e,
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let Some(name) = path.file_name().and_then(|n| n.to_str()).map(String::from) else {
            log::warn!("Skipping non UTF-8 file name in {}", dir.display());
            continue;
        };

        match options.migration_id(&name) {
            Some(id) => migrations.push(MigrationFile { id, path, name }),
            None => log::debug!("Not a forward migration: {}", name),
        }
    }

    migrations.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(Loaded::ok(migrations))
}

#[cfg(test)]
#[path = "migration_test.rs"]
mod tests;
