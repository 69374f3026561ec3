//! Pending-migration planning: catalog minus deployed state.

use crate::migration::MigrationFile;
use crate::state::DeployedSet;
use std::collections::HashSet;

/// The outcome of diffing a catalog against the deployed state
#[derive(Debug, Clone)]
pub struct DeployPlan<'a> {
    /// Catalog migrations not yet deployed, in catalog order
    pub pending: Vec<&'a MigrationFile>,
    /// Number of catalog migrations already deployed
    pub already_deployed: usize,
    /// Deployed ids with no matching catalog file
    pub unknown_deployed: Vec<String>,
}

impl DeployPlan<'_> {
    pub fn is_up_to_date(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Compute `catalog - deployed`, preserving catalog order.
pub fn pending_migrations<'a>(
    catalog: &'a [MigrationFile],
    deployed: &DeployedSet,
) -> Vec<&'a MigrationFile> {
    let deployed_ids: HashSet<&str> = deployed.iter().map(|m| m.as_str()).collect();
    catalog
        .iter()
        .filter(|m| !deployed_ids.contains(m.id.as_str()))
        .collect()
}

/// Build a full [`DeployPlan`], including ids the catalog no longer has.
pub fn plan<'a>(catalog: &'a [MigrationFile], deployed: &DeployedSet) -> DeployPlan<'a> {
    let pending = pending_migrations(catalog, deployed);
    let catalog_ids: HashSet<&str> = catalog.iter().map(|m| m.id.as_str()).collect();

    let mut seen = HashSet::new();
    let unknown_deployed = deployed
        .iter()
        .map(|m| m.as_str())
        .filter(|id| !catalog_ids.contains(id) && seen.insert(*id))
        .map(String::from)
        .collect();

    DeployPlan {
        already_deployed: catalog.len() - pending.len(),
        pending,
        unknown_deployed,
    }
}

#[cfg(test)]
#[path = "plan_test.rs"]
mod tests;
