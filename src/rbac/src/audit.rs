//! Configuration mismatch audit
//!
//! Runs once when an engine is built. Compares the restricted resources with
//! the resources that have permission entries.

use crate::gate::RestrictedModels;
use crate::permissions::PermissionTable;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Callback receiving `(missing, redundant)`
pub type MismatchHandler = Arc<dyn Fn(&[String], &[String]) + Send + Sync>;

/// Result of comparing restricted models against the permission table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mismatch {
    /// Restricted resources with no permission entry. Every operation on them is denied.
    pub missing: Vec<String>,

    /// Resources with permission entries that are never enforced
    pub redundant: Vec<String>,
}

impl Mismatch {
    /// Whether the handler should be invoked. Redundant entries alone do not trigger it.
    pub fn should_report(&self) -> bool {
        !self.missing.is_empty()
    }
}

/// Compare `restricted` against `permissions`.
///
/// Returns `None` when the restricted list is malformed, skipping the audit.
/// `missing` keeps restricted-list order; `redundant` is sorted.
pub fn audit(restricted: &RestrictedModels, permissions: Option<&PermissionTable>) -> Option<Mismatch> {
    let models = restricted.as_list()?;

    let missing = models
        .iter()
        .filter(|model| !permissions.is_some_and(|table| table.contains_resource(model)))
        .cloned()
        .collect();

    let mut redundant: Vec<String> = permissions
        .map(|table| {
            table
                .resources()
                .filter(|resource| !restricted.is_restricted(resource))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    redundant.sort();

    Some(Mismatch { missing, redundant })
}
