//! Deploy command: apply every pending migration and record the result.
//!
//! Phases run in a fixed order: probe the tool, make sure the database
//! exists, diff the catalog against the deployed state, apply pending
//! migrations one at a time, persist the state once, report. A failed probe
//! or database creation aborts before anything is applied; a failed migration
//! is recorded and the loop moves on.

mod apply;

use anyhow::Result;
use chrono::Utc;
use mig_core::{discover_migrations, plan, CoreError};
use mig_tool::{DatabaseTool, ToolError};
use std::fmt;
use std::time::Instant;

use crate::cli::Cli;
use crate::commands::common::{pluralize, write_json_results, CommandResults, ExitCode};
use crate::context::DeployContext;

pub(crate) use apply::{apply_migration, ExecutionResult};

/// Conditions that end a deploy before any migration is applied
#[derive(Debug)]
pub(crate) enum DeployAbort {
    /// Version probe failed
    ToolUnavailable(ToolError),
    /// Listing or creating the database failed
    DatabaseEnsure(ToolError),
    /// Migrations directory exists but could not be read
    Catalog(CoreError),
}

impl fmt::Display for DeployAbort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeployAbort::ToolUnavailable(e) => write!(f, "Database tool not available: {e}"),
            DeployAbort::DatabaseEnsure(e) => write!(f, "Error checking/creating database: {e}"),
            DeployAbort::Catalog(e) => write!(f, "Could not read migrations: {e}"),
        }
    }
}

impl std::error::Error for DeployAbort {}

/// What a completed (non-aborted) deploy did
#[derive(Debug)]
pub(crate) struct DeployReport {
    pub(crate) database: String,
    /// Migrations found in the catalog
    pub(crate) available: usize,
    /// Ids in the state file when the run started
    pub(crate) previously_deployed: usize,
    /// Pending migration file names, in apply order
    pub(crate) pending: Vec<String>,
    pub(crate) results: Vec<ExecutionResult>,
    /// Set when the state file could not be written; reported, not fatal
    pub(crate) persist_error: Option<CoreError>,
    pub(crate) dry_run: bool,
}

impl DeployReport {
    fn new(ctx: &DeployContext) -> Self {
        Self {
            database: ctx.database.clone(),
            available: 0,
            previously_deployed: 0,
            pending: Vec::new(),
            results: Vec::new(),
            persist_error: None,
            dry_run: ctx.dry_run,
        }
    }

    pub(crate) fn success_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    pub(crate) fn failure_count(&self) -> usize {
        self.results.len() - self.success_count()
    }

    pub(crate) fn failed_files(&self) -> Vec<&str> {
        self.results
            .iter()
            .filter(|r| !r.is_success())
            .map(|r| r.file.as_str())
            .collect()
    }

    pub(crate) fn is_success(&self) -> bool {
        self.failure_count() == 0
    }

    /// Whether the apply loop ran (and a summary is worth printing)
    fn attempted(&self) -> bool {
        !self.results.is_empty()
    }
}

/// Execute the deploy command
pub async fn execute(cli: &Cli) -> Result<()> {
    let ctx = DeployContext::from_cli(cli)?;
    let tool = ctx.wrangler();
    let started = Instant::now();

    println!("Starting migration deployment to '{}'...", ctx.database);

    let report = match reconcile(&tool, &ctx).await {
        Ok(report) => report,
        Err(abort) => {
            eprintln!("{abort}");
            return Err(ExitCode(1).into());
        }
    };

    if report.attempted() {
        print_summary(&report);
        write_results(&ctx, &report, started.elapsed().as_secs_f64());
    }

    if report.is_success() {
        if report.dry_run {
            println!("\nDry run complete, nothing was applied.");
        } else {
            println!("\nMigration deployment completed successfully!");
        }
        Ok(())
    } else {
        eprintln!("\nMigration deployment failed!");
        Err(ExitCode(1).into())
    }
}

/// Run every deploy phase against `tool`.
///
/// Returns `Err` only for the fatal phases; per-migration failures and a
/// failed state write are carried in the report.
pub(crate) async fn reconcile(
    tool: &dyn DatabaseTool,
    ctx: &DeployContext,
) -> Result<DeployReport, DeployAbort> {
    let mut report = DeployReport::new(ctx);

    let version = tool
        .probe_version()
        .await
        .map_err(DeployAbort::ToolUnavailable)?;
    println!("Using {} {}", tool.tool_name(), version);

    if ctx.dry_run || ctx.skip_create {
        ctx.verbose("Skipping database existence check");
    } else {
        ensure_database(tool, &ctx.database)
            .await
            .map_err(DeployAbort::DatabaseEnsure)?;
    }

    let (catalog, catalog_warning) = discover_migrations(&ctx.migrations_dir, &ctx.catalog)
        .map_err(DeployAbort::Catalog)?
        .into_parts();
    if let Some(warning) = catalog_warning {
        log::warn!("{}", warning);
    }

    let store = ctx.state_store();
    let (mut deployed, state_warning) = store.load().into_parts();
    if let Some(warning) = state_warning {
        log::warn!("{}", warning);
        log::warn!("All migrations will be treated as pending");
    }

    report.available = catalog.len();
    report.previously_deployed = deployed.len();

    if catalog.is_empty() {
        println!("No migrations found");
        return Ok(report);
    }

    println!("Found {}", pluralize(catalog.len(), "migration"));
    println!("{} already deployed", pluralize(deployed.len(), "migration"));

    let deploy_plan = plan(&catalog, &deployed);
    for id in &deploy_plan.unknown_deployed {
        log::warn!("Deployed migration '{}' has no file in the catalog", id);
    }
    report.pending = deploy_plan.pending.iter().map(|m| m.name.clone()).collect();

    if deploy_plan.is_up_to_date() {
        println!("All migrations already deployed");
        return Ok(report);
    }

    if ctx.dry_run {
        println!("Pending {}:", pluralize(report.pending.len(), "migration"));
        for name in &report.pending {
            println!("  - {name}");
        }
        return Ok(report);
    }

    println!(
        "Deploying {}...",
        pluralize(deploy_plan.pending.len(), "pending migration")
    );

    for migration in &deploy_plan.pending {
        println!("  Deploying: {}", migration.name);
        let result = apply_migration(tool, &ctx.database, migration).await;
        if result.is_success() {
            println!("  [ok] {} ({:.2}s)", migration.name, result.duration_secs);
            deployed.push(migration.id.clone());
        } else {
            eprintln!("  [error] {}", migration.name);
            if let Some(error) = &result.error {
                eprintln!("    {error}");
            }
        }
        report.results.push(result);
    }

    if let Err(e) = store.save(&deployed) {
        eprintln!("[error] {e}");
        report.persist_error = Some(e);
    } else {
        ctx.verbose(&format!(
            "Saved {} to {}",
            pluralize(deployed.len(), "deployed migration"),
            store.path().display()
        ));
    }

    Ok(report)
}

/// Create `database` unless the tool already lists it.
///
/// A list command that exits non-zero skips the check: the database is
/// assumed to exist and any real problem surfaces when migrations run.
async fn ensure_database(tool: &dyn DatabaseTool, database: &str) -> Result<(), ToolError> {
    println!("Checking if database '{database}' exists...");
    let databases = match tool.list_databases().await {
        Ok(databases) => databases,
        Err(e @ ToolError::CommandFailed { .. }) => {
            log::warn!("Could not list databases, skipping existence check: {}", e);
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    if databases.iter().any(|db| db.name == database) {
        println!("Database '{database}' already exists");
        return Ok(());
    }

    println!("Creating database: {database}");
    tool.create_database(database).await?;
    println!("Database created successfully");
    Ok(())
}

fn print_summary(report: &DeployReport) {
    let rule = "=".repeat(50);
    println!("\n{rule}");
    println!("MIGRATION DEPLOYMENT SUMMARY ({})", report.database);
    println!("{rule}");
    println!(
        "Migrations available: {} ({} previously deployed)",
        report.available, report.previously_deployed
    );
    println!("Successfully deployed: {}", report.success_count());
    println!("Failed deployments: {}", report.failure_count());

    let failed = report.failed_files();
    if !failed.is_empty() {
        println!("\nFailed migrations:");
        for name in failed {
            println!("  - {name}");
        }
    }
    if report.persist_error.is_some() {
        println!("\nDeployed state was NOT saved; applied migrations will be retried next run.");
    }
}

fn write_results(ctx: &DeployContext, report: &DeployReport, elapsed_secs: f64) {
    let results = CommandResults {
        timestamp: Utc::now(),
        elapsed_secs,
        success_count: report.success_count(),
        failure_count: report.failure_count(),
        results: report.results.clone(),
    };
    if let Err(e) = write_json_results(&ctx.results_path, &results) {
        log::warn!("Could not write run results: {e:#}");
    } else {
        ctx.verbose(&format!("Wrote results to {}", ctx.results_path.display()));
    }
}

#[cfg(test)]
#[path = "deploy_test.rs"]
mod tests;
