//! Call API DTOs

use crate::domain::call::{Call, Command, OperatorStatus, PhoneState};
use serde::{Deserialize, Serialize};

/// Dial request body
#[derive(Debug, Default, Deserialize)]
pub struct DialRequest {
    #[serde(default)]
    pub phone: Option<String>,
}

impl From<DialRequest> for Command {
    fn from(req: DialRequest) -> Self {
        Command::Dial { phone: req.phone }
    }
}

/// Answer/hangup request body
///
/// `call_id` is accepted for client compatibility; there is only ever one
/// call so it is not used for routing.
#[derive(Debug, Default, Deserialize)]
pub struct CallActionRequest {
    #[serde(default)]
    pub call_id: Option<String>,
}

/// Operator status request body
#[derive(Debug, Default, Deserialize)]
pub struct StatusRequest {
    #[serde(default)]
    pub status: Option<String>,
}

impl From<StatusRequest> for Command {
    fn from(req: StatusRequest) -> Self {
        Command::SetOperatorStatus {
            status: OperatorStatus::from(req.status),
        }
    }
}

/// Decode a request body, treating empty or malformed input as `{}`
pub fn parse_body<T: Default + for<'de> Deserialize<'de>>(body: &[u8]) -> T {
    if body.is_empty() {
        return T::default();
    }
    serde_json::from_slice(body).unwrap_or_default()
}

/// Acknowledgement returned by every command endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResponse {
    pub status: String,
}

impl CommandResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

/// Current state response
#[derive(Debug, Serialize)]
pub struct StateResponse {
    pub operator_status: OperatorStatus,
    pub active_call: Option<Call>,
    pub subscribers: usize,
}

impl StateResponse {
    pub fn new(state: PhoneState, subscribers: usize) -> Self {
        Self {
            operator_status: state.operator_status().clone(),
            active_call: state.active_call().cloned(),
            subscribers,
        }
    }
}
