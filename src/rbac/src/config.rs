//! Evaluator configuration
//!
//! Options can be assembled in code or read from JSON:
//!
//! ```json
//! {
//!   "permissions": { "user": { "read": true, "create": true } },
//!   "restrictedModels": ["user", "note"],
//!   "allowedActions": ["note:read"],
//!   "synonyms": { "note": ["notes"] },
//!   "debug": false
//! }
//! ```
//!
//! Reading never fails on the shape of the document. Malformed sections fall
//! back to the most conservative reading: no permissions, nothing restricted,
//! nothing allow-listed, no synonyms.

use crate::action::Action;
use crate::alias::SynonymTable;
use crate::error::Result;
use crate::gate::{AllowList, RestrictedModels};
use crate::permissions::PermissionTable;
use serde_json::Value;
use std::path::Path;
use tracing::debug;

/// Static configuration of an evaluator
#[derive(Debug, Clone, Default)]
pub struct RbacOptions {
    /// Grants driving every permission check. `None` denies everything restricted.
    pub permissions: Option<PermissionTable>,

    /// Resources subject to enforcement
    pub restricted_models: RestrictedModels,

    /// `resource:action` pairs that bypass permission checks
    pub allowed_actions: AllowList,

    /// Canonical resource name to aliases
    pub synonyms: SynonymTable,

    /// Log every check at info level
    pub debug: bool,
}

impl RbacOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_permissions(mut self, permissions: PermissionTable) -> Self {
        self.permissions = Some(permissions);
        self
    }

    pub fn with_restricted_models<I, S>(mut self, models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.restricted_models = RestrictedModels::models(models);
        self
    }

    pub fn with_allowed_actions<I, S>(mut self, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_actions = actions.into_iter().collect();
        self
    }

    pub fn with_synonyms(mut self, synonyms: SynonymTable) -> Self {
        self.synonyms = synonyms;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Read options from an untyped JSON document
    pub fn from_value(value: &Value) -> Self {
        let options = Self {
            permissions: value.get("permissions").and_then(parse_permissions),
            restricted_models: RestrictedModels::from_value(value.get("restrictedModels")),
            allowed_actions: parse_string_list(value.get("allowedActions")).collect(),
            synonyms: value.get("synonyms").map(parse_synonyms).unwrap_or_default(),
            debug: value.get("debug").and_then(Value::as_bool).unwrap_or(false),
        };

        debug!(
            "Loaded RBAC options: {} permission entries, {} allowed actions, {} synonym groups",
            options.permissions.as_ref().map_or(0, PermissionTable::len),
            options.allowed_actions.len(),
            options.synonyms.len()
        );

        options
    }

    /// Parse options from JSON text. Fails only if the text is not JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Ok(Self::from_value(&value))
    }

    /// Read options from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }
}

fn parse_permissions(value: &Value) -> Option<PermissionTable> {
    let resources = value.as_object()?;
    let mut table = PermissionTable::new();

    for (resource, grants) in resources {
        let Some(grants) = grants.as_object() else {
            continue;
        };
        table = table.with_resource(resource.as_str());
        for (action, granted) in grants {
            if let (Ok(action), Some(granted)) = (action.parse::<Action>(), granted.as_bool()) {
                table.set(resource.as_str(), action, granted);
            }
        }
    }

    Some(table)
}

fn parse_string_list(value: Option<&Value>) -> impl Iterator<Item = String> + '_ {
    value
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|item| item.as_str().map(str::to_string))
}

fn parse_synonyms(value: &Value) -> SynonymTable {
    value
        .as_object()
        .into_iter()
        .flatten()
        .filter(|(_, aliases)| aliases.is_array())
        .map(|(canonical, aliases)| (canonical.clone(), parse_string_list(Some(aliases)).collect::<Vec<_>>()))
        .collect()
}
