//! Rule references shared by characteristics and violation records

use serde::{Deserialize, Serialize};

/// Reference to an external verification rule, identified by key and name.
///
/// Rules themselves live outside this crate; the domain only carries the
/// identifying pair needed to attach a characteristic or a violation to one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RuleRef {
    /// Stable rule key, e.g. `"checkstyle:com.puppycrawl.MagicNumberCheck"`
    pub key: String,
    /// Human-readable rule name
    pub name: String,
}

impl RuleRef {
    /// Create a new rule reference
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self { key: key.into(), name: name.into() }
    }
}
