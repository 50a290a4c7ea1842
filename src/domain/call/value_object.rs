//! Call value objects

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Call state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallState {
    /// Outbound call placed, far end not yet connected
    Dialing,
    /// Inbound call waiting to be answered
    Incoming,
    /// Call is connected
    Talking,
}

impl CallState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallState::Dialing => "dialing",
            CallState::Incoming => "incoming",
            CallState::Talking => "talking",
        }
    }
}

/// Operator availability
///
/// The wire form is a plain string. Values outside the known set are kept
/// verbatim in [`OperatorStatus::Custom`]; a missing value is
/// [`OperatorStatus::Unset`] and travels as JSON `null`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OperatorStatus {
    #[default]
    Ready,
    Busy,
    Lunch,
    Dnd,
    Offline,
    Custom(String),
    Unset,
}

impl OperatorStatus {
    pub fn parse(value: &str) -> Self {
        match value {
            "ready" => OperatorStatus::Ready,
            "busy" => OperatorStatus::Busy,
            "lunch" => OperatorStatus::Lunch,
            "dnd" => OperatorStatus::Dnd,
            "offline" => OperatorStatus::Offline,
            other => OperatorStatus::Custom(other.to_string()),
        }
    }

    /// Wire string, `None` for [`OperatorStatus::Unset`]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            OperatorStatus::Ready => Some("ready"),
            OperatorStatus::Busy => Some("busy"),
            OperatorStatus::Lunch => Some("lunch"),
            OperatorStatus::Dnd => Some("dnd"),
            OperatorStatus::Offline => Some("offline"),
            OperatorStatus::Custom(value) => Some(value),
            OperatorStatus::Unset => None,
        }
    }
}

impl From<Option<String>> for OperatorStatus {
    fn from(value: Option<String>) -> Self {
        value
            .as_deref()
            .map_or(OperatorStatus::Unset, OperatorStatus::parse)
    }
}

impl fmt::Display for OperatorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str().unwrap_or("null"))
    }
}

impl Serialize for OperatorStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.as_str() {
            Some(value) => serializer.serialize_str(value),
            None => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for OperatorStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<String>::deserialize(deserializer).map(OperatorStatus::from)
    }
}
