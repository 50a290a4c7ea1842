//! Shared value objects

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Call identifier
///
/// Opaque to clients. Dialed calls are prefixed `call_`, simulated
/// inbound calls `inc_`, followed by a random v4 UUID in simple form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallId(String);

impl CallId {
    /// Fresh id for an outbound (dialed) call
    pub fn dialed() -> Self {
        Self(format!("call_{}", Uuid::new_v4().simple()))
    }

    /// Fresh id for a simulated inbound call
    pub fn incoming() -> Self {
        Self(format!("inc_{}", Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for CallId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for CallId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for CallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
