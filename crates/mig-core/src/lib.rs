//! mig-core - Core library for mig
//!
//! This crate provides configuration parsing, the migration catalog reader,
//! the deployed-state store, and pending-migration planning shared by the
//! `mig` CLI.

pub mod config;
pub mod error;
pub mod migration;
pub mod migration_id;
pub mod plan;
pub mod state;

pub use config::{Config, ToolConfig, DEFAULT_DATABASE};
pub use error::{CoreError, CoreResult, Loaded};
pub use migration::{discover_migrations, CatalogOptions, MigrationFile};
pub use migration_id::MigrationId;
pub use plan::{pending_migrations, plan, DeployPlan};
pub use state::{DeployedSet, StateStore};
