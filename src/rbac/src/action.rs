//! CRUD actions and the operation classifier

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Name reported for operations that do not map to an action
pub const UNKNOWN_ACTION: &str = "unknown";

/// Abstract action an operation performs on a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
}

impl Action {
    /// Every action, in declaration order
    pub const ALL: [Action; 4] = [Action::Create, Action::Read, Action::Update, Action::Delete];

    pub fn as_str(self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Read => "read",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }

    /// Action name, or [`UNKNOWN_ACTION`] for an unclassified operation
    pub fn name_or_unknown(action: Option<Action>) -> &'static str {
        action.map_or(UNKNOWN_ACTION, Action::as_str)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown action name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown action: {0}")]
pub struct ParseActionError(pub String);

impl FromStr for Action {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(Action::Create),
            "read" => Ok(Action::Read),
            "update" => Ok(Action::Update),
            "delete" => Ok(Action::Delete),
            other => Err(ParseActionError(other.to_string())),
        }
    }
}

const READ_OPERATIONS: &[&str] = &[
    "findUniqueOrThrow",
    "findFirstOrThrow",
    "findUnique",
    "findFirst",
    "aggregate",
    "findMany",
    "groupBy",
    "count",
];
const CREATE_OPERATIONS: &[&str] = &["createManyAndReturn", "createMany", "create"];
const UPDATE_OPERATIONS: &[&str] = &["updateMany", "update", "upsert"];
const DELETE_OPERATIONS: &[&str] = &["deleteMany", "delete"];

/// Raw operation names that perform `action`
pub fn operations_for(action: Action) -> &'static [&'static str] {
    match action {
        Action::Create => CREATE_OPERATIONS,
        Action::Read => READ_OPERATIONS,
        Action::Update => UPDATE_OPERATIONS,
        Action::Delete => DELETE_OPERATIONS,
    }
}

/// Map a raw operation name to its action.
///
/// `None` means the name is not an authorizable operation. Callers must not
/// substitute a default action for it.
pub fn classify(operation: &str) -> Option<Action> {
    match operation {
        "findUniqueOrThrow" | "findFirstOrThrow" | "findUnique" | "findFirst" | "aggregate"
        | "findMany" | "groupBy" | "count" => Some(Action::Read),
        "createManyAndReturn" | "createMany" | "create" => Some(Action::Create),
        "updateMany" | "update" | "upsert" => Some(Action::Update),
        "deleteMany" | "delete" => Some(Action::Delete),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_known_operations() {
        assert_eq!(classify("findMany"), Some(Action::Read));
        assert_eq!(classify("count"), Some(Action::Read));
        assert_eq!(classify("createManyAndReturn"), Some(Action::Create));
        assert_eq!(classify("upsert"), Some(Action::Update));
        assert_eq!(classify("deleteMany"), Some(Action::Delete));
    }

    #[test]
    fn test_classify_structural_keys() {
        assert_eq!(classify("data"), None);
        assert_eq!(classify("where"), None);
        assert_eq!(classify("connect"), None);
        assert_eq!(classify("FindMany"), None);
        assert_eq!(classify(""), None);
    }

    #[test]
    fn test_operation_lists_agree_with_classifier() {
        for action in Action::ALL {
            for operation in operations_for(action) {
                assert_eq!(classify(operation), Some(action), "{operation}");
            }
        }
    }

    #[test]
    fn test_action_parsing() {
        assert_eq!("update".parse::<Action>(), Ok(Action::Update));
        assert!("Update".parse::<Action>().is_err());
        assert_eq!(Action::Delete.to_string(), "delete");
        assert_eq!(Action::name_or_unknown(None), "unknown");
    }

    #[test]
    fn test_action_serde() {
        let json = serde_json::to_string(&Action::Create).unwrap();
        assert_eq!(json, "\"create\"");
        let back: Action = serde_json::from_str("\"read\"").unwrap();
        assert_eq!(back, Action::Read);
    }
}
