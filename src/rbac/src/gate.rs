//! Restriction gate: decides whether a call is subject to checking at all

use crate::action::Action;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Resources subject to enforcement
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RestrictedModels {
    /// Nothing is enforced. Used when the configured value is absent or not a list.
    #[default]
    Unrestricted,

    /// Only the listed resources are enforced
    Models(Vec<String>),
}

impl RestrictedModels {
    pub fn models<I, S>(models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RestrictedModels::Models(models.into_iter().map(Into::into).collect())
    }

    /// Read from an untyped value.
    ///
    /// A list keeps its string entries and drops everything else. Any other
    /// shape means nothing is restricted.
    pub fn from_value(value: Option<&serde_json::Value>) -> Self {
        match value {
            Some(serde_json::Value::Array(items)) => RestrictedModels::Models(
                items
                    .iter()
                    .filter_map(|item| item.as_str().map(str::to_string))
                    .collect(),
            ),
            _ => RestrictedModels::Unrestricted,
        }
    }

    pub fn is_restricted(&self, resource: &str) -> bool {
        match self {
            RestrictedModels::Unrestricted => false,
            RestrictedModels::Models(models) => models.iter().any(|m| m == resource),
        }
    }

    /// The configured list, `None` when unrestricted
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            RestrictedModels::Unrestricted => None,
            RestrictedModels::Models(models) => Some(models),
        }
    }
}

/// Pre-approved `resource:action` pairs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AllowList {
    entries: HashSet<String>,
}

impl AllowList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow `action` on `resource` without consulting permissions
    pub fn allow(mut self, resource: &str, action: Action) -> Self {
        self.entries.insert(action_key(resource, Some(action)));
        self
    }

    pub fn contains(&self, resource: &str, action: Option<Action>) -> bool {
        !self.entries.is_empty() && self.entries.contains(&action_key(resource, action))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for AllowList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// `resource:action` key; unclassified operations use `resource:unknown`
pub fn action_key(resource: &str, action: Option<Action>) -> String {
    format!("{}:{}", resource, Action::name_or_unknown(action))
}

/// Restricted models plus allow-list
#[derive(Debug, Clone, Default)]
pub struct RestrictionGate {
    restricted: RestrictedModels,
    allowed: AllowList,
}

impl RestrictionGate {
    pub fn new(restricted: RestrictedModels, allowed: AllowList) -> Self {
        Self { restricted, allowed }
    }

    /// Whether the call proceeds without any permission lookup
    pub fn is_exempt(&self, resource: &str, action: Option<Action>) -> bool {
        !self.restricted.is_restricted(resource) || self.allowed.contains(resource, action)
    }

    pub fn restricted(&self) -> &RestrictedModels {
        &self.restricted
    }

    pub fn allowed(&self) -> &AllowList {
        &self.allowed
    }
}
