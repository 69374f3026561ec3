//! mig-tool - External database tool layer for mig
//!
//! This crate provides the `DatabaseTool` trait describing what mig needs
//! from a database service's command-line tool, a subprocess runner with
//! timeouts, and the `wrangler` (Cloudflare D1) implementation.

pub mod command;
pub mod error;
#[cfg(feature = "test-support")]
pub mod testing;
pub mod traits;
pub mod wrangler;

pub use command::CommandRunner;
pub use error::{ToolError, ToolResult};
pub use traits::{CommandOutput, DatabaseTool, RemoteDatabase};
pub use wrangler::WranglerTool;
