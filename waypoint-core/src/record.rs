//! The opaque record a registry hands back for a service name.

use serde::{Deserialize, Serialize};

/// Opaque description of how to reach a named service.
///
/// The client never looks inside a record. It is stored in the cache and
/// handed back to callers exactly as the registry produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceRecord(serde_json::Value);

impl ServiceRecord {
    /// Wrap a raw JSON value.
    #[must_use]
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    /// Borrow the raw JSON value.
    #[must_use]
    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }

    /// Unwrap into the raw JSON value.
    #[must_use]
    pub fn into_value(self) -> serde_json::Value {
        self.0
    }
}

impl From<serde_json::Value> for ServiceRecord {
    fn from(value: serde_json::Value) -> Self {
        Self::new(value)
    }
}

impl std::fmt::Display for ServiceRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
