//! Outcome of a permitted evaluation

use serde::{Deserialize, Serialize};

/// Why an operation was allowed to proceed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    /// Resource is not restricted, or the pair is allow-listed
    Exempt,

    /// Top-level and every nested operation are granted
    Granted,
}

impl Decision {
    pub fn as_str(self) -> &'static str {
        match self {
            Decision::Exempt => "exempt",
            Decision::Granted => "granted",
        }
    }
}
