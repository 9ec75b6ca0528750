//! Permission table and grant lookup

use crate::action::Action;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Grants for a single resource. Missing actions are not granted.
pub type ResourcePermissions = HashMap<Action, bool>;

/// Resource name to per-action grants
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionTable {
    resources: HashMap<String, ResourcePermissions>,
}

impl PermissionTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `action` on `resource` to `granted`.
    ///
    /// Registers the resource even when `granted` is false, which matters to
    /// the mismatch audit.
    pub fn with(mut self, resource: impl Into<String>, action: Action, granted: bool) -> Self {
        self.set(resource, action, granted);
        self
    }

    /// Grant `action` on `resource`
    pub fn grant(self, resource: impl Into<String>, action: Action) -> Self {
        self.with(resource, action, true)
    }

    /// Register a resource with no grants
    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resources.entry(resource.into()).or_default();
        self
    }

    pub fn set(&mut self, resource: impl Into<String>, action: Action, granted: bool) {
        self.resources
            .entry(resource.into())
            .or_default()
            .insert(action, granted);
    }

    /// Whether `action` is explicitly granted on `resource`
    pub fn allows(&self, resource: &str, action: Action) -> bool {
        self.resources
            .get(resource)
            .and_then(|grants| grants.get(&action))
            .copied()
            .unwrap_or(false)
    }

    pub fn contains_resource(&self, resource: &str) -> bool {
        self.resources.contains_key(resource)
    }

    /// Resource names with an entry, in arbitrary order
    pub fn resources(&self) -> impl Iterator<Item = &str> {
        self.resources.keys().map(String::as_str)
    }

    pub fn get(&self, resource: &str) -> Option<&ResourcePermissions> {
        self.resources.get(resource)
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

impl FromIterator<(String, ResourcePermissions)> for PermissionTable {
    fn from_iter<I: IntoIterator<Item = (String, ResourcePermissions)>>(iter: I) -> Self {
        Self {
            resources: iter.into_iter().collect(),
        }
    }
}

/// Whether `action` is granted on `resource`.
///
/// False when the table is absent, the resource is absent or empty, the
/// operation had no action, or the entry does not explicitly grant it.
pub fn is_granted(
    permissions: Option<&PermissionTable>,
    action: Option<Action>,
    resource: Option<&str>,
) -> bool {
    match (permissions, action, resource) {
        (Some(table), Some(action), Some(resource)) if !resource.is_empty() => {
            table.allows(resource, action)
        }
        _ => false,
    }
}
