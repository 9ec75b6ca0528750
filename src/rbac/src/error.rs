//! Error types for the permission evaluator

use crate::action::Action;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// HTTP-style status attached to every denial
pub const FORBIDDEN_STATUS: u16 = 403;

/// Error tag used on the wire for denials
pub const ERROR_TAG: &str = "RBACError";

/// Denial raised when a top-level or nested permission check fails.
///
/// Nested failures are attributed to the top-level resource and action, so the
/// caller cannot tell which nested resource was protected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct AuthorizationError {
    action: Option<Action>,
    resource: String,
    status_code: u16,
    message: String,
}

impl AuthorizationError {
    pub(crate) fn new(action: Option<Action>, resource: impl Into<String>, message: String) -> Self {
        Self {
            action,
            resource: resource.into(),
            status_code: FORBIDDEN_STATUS,
            message,
        }
    }

    /// Action of the denied operation, `None` if it could not be classified
    pub fn action(&self) -> Option<Action> {
        self.action
    }

    /// Action name as reported on the wire
    pub fn operation(&self) -> &'static str {
        Action::name_or_unknown(self.action)
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// Translated message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Wire representation of the denial
    pub fn payload(&self) -> DenialPayload {
        DenialPayload {
            error: ERROR_TAG.to_string(),
            error_type: ERROR_TAG.to_string(),
            status: self.status_code,
            model: self.resource.clone(),
            operation: self.operation().to_string(),
            message: self.message.clone(),
        }
    }
}

/// Serializable denial surface returned to callers of the guarded client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DenialPayload {
    pub error: String,

    #[serde(rename = "type")]
    pub error_type: String,

    pub status: u16,

    /// Resource the denied operation targeted
    pub model: String,

    /// Action name, or `unknown`
    pub operation: String,

    pub message: String,
}

/// Evaluator errors
#[derive(Debug, Error)]
pub enum RbacError {
    /// Permission denied for the operation or one of its nested operations
    #[error("{0}")]
    Denied(#[from] AuthorizationError),

    /// Configuration text is not JSON
    #[error("Invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The wrapped data store failed to run the operation
    #[error("Query failed: {0}")]
    Query(String),
}

impl RbacError {
    /// The denial, if this error is one
    pub fn as_denied(&self) -> Option<&AuthorizationError> {
        match self {
            RbacError::Denied(denied) => Some(denied),
            _ => None,
        }
    }
}

/// Result type for evaluator operations
pub type Result<T> = std::result::Result<T, RbacError>;
