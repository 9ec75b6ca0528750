//! Nested operation discovery
//!
//! Operation arguments have no fixed schema. The walker treats every mapping
//! key that names an operation (`create`, `updateMany`, ...) as an invocation
//! of that operation on the current resource, and every other key holding a
//! composite value as a relation field naming a related resource:
//!
//! ```text
//! user.create { data: { notes: { create: {..} } } }
//!               │       │        └─ create on "notes" → resolves to "note"
//!               │       └─ relation "notes"
//!               └─ relation "data" (no operations below it besides notes)
//! ```
//!
//! The related resource is the field name lower-cased. Relation fields whose
//! lower-cased name differs from the resource name need a synonym entry.

use crate::action::classify;
use crate::alias::{resolve_alias, SynonymTable};
use crate::permissions::{is_granted, PermissionTable};
use serde_json::Value;
use tracing::debug;

/// Walks an argument tree checking every embedded operation
#[derive(Debug, Clone, Copy)]
pub struct NestedWalker<'a> {
    permissions: Option<&'a PermissionTable>,
    synonyms: Option<&'a SynonymTable>,
}

impl<'a> NestedWalker<'a> {
    pub fn new(permissions: Option<&'a PermissionTable>, synonyms: Option<&'a SynonymTable>) -> Self {
        Self {
            permissions,
            synonyms,
        }
    }

    /// True when every operation nested in `args` is granted. No tree is
    /// vacuously authorized.
    pub fn authorized(&self, resource: &str, args: Option<&Value>) -> bool {
        args.map_or(true, |tree| self.walk(resource, tree))
    }

    fn walk(&self, resource: &str, tree: &Value) -> bool {
        match tree {
            Value::Object(fields) => fields
                .iter()
                .all(|(key, value)| self.check_field(resource, key, value)),
            Value::Array(items) => items.iter().all(|item| self.walk(resource, item)),
            _ => true,
        }
    }

    fn check_field(&self, resource: &str, key: &str, value: &Value) -> bool {
        if !is_composite(value) {
            return true;
        }

        match classify(key) {
            Some(action) => {
                let target = resolve_alias(Some(resource), self.synonyms);
                let granted = is_granted(self.permissions, Some(action), target);
                if !granted {
                    debug!(
                        "Nested {} on '{}' denied",
                        action,
                        target.unwrap_or(resource)
                    );
                }
                granted
            }
            None => self.walk(&key.to_lowercase(), value),
        }
    }
}

fn is_composite(value: &Value) -> bool {
    matches!(value, Value::Object(_) | Value::Array(_))
}

/// Whether every operation nested in `args` is granted on its resource
pub fn all_nested_authorized(
    permissions: Option<&PermissionTable>,
    synonyms: Option<&SynonymTable>,
    resource: &str,
    args: Option<&Value>,
) -> bool {
    NestedWalker::new(permissions, synonyms).authorized(resource, args)
}
