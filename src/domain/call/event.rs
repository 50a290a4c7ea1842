//! Call domain events
//!
//! Each event is a `(type, payload)` pair. The payload structs below
//! serialize to exactly the JSON object observers receive.

use crate::domain::call::aggregate::Call;
use crate::domain::call::value_object::OperatorStatus;
use crate::domain::shared::error::DomainError;
use crate::domain::shared::error::Result;
use crate::domain::shared::value_objects::CallId;
use serde::{Deserialize, Serialize};

/// Operator status changed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChanged {
    pub status: OperatorStatus,
}

/// Call reached the talking state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallConnected {
    pub start_time: i64,
}

/// Call was torn down
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallEnded {}

/// Inbound call is ringing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallIncoming {
    pub number: Option<String>,
    pub call_id: CallId,
}

/// Union of all events published to observers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhoneEvent {
    StatusChange(StatusChanged),
    CallConnected(CallConnected),
    CallEnded(CallEnded),
    CallIncoming(CallIncoming),
}

impl PhoneEvent {
    pub const STATUS_CHANGE: &'static str = "status_change";
    pub const CALL_CONNECTED: &'static str = "call_connected";
    pub const CALL_ENDED: &'static str = "call_ended";
    pub const CALL_INCOMING: &'static str = "call_incoming";

    pub fn status_change(status: OperatorStatus) -> Self {
        PhoneEvent::StatusChange(StatusChanged { status })
    }

    pub fn call_connected(call: &Call) -> Self {
        PhoneEvent::CallConnected(CallConnected {
            start_time: call.start_time(),
        })
    }

    pub fn call_ended() -> Self {
        PhoneEvent::CallEnded(CallEnded {})
    }

    pub fn call_incoming(call: &Call) -> Self {
        PhoneEvent::CallIncoming(CallIncoming {
            number: call.phone_number().map(str::to_string),
            call_id: call.id().clone(),
        })
    }

    /// Wire name of the event
    pub fn event_type(&self) -> &'static str {
        match self {
            PhoneEvent::StatusChange(_) => Self::STATUS_CHANGE,
            PhoneEvent::CallConnected(_) => Self::CALL_CONNECTED,
            PhoneEvent::CallEnded(_) => Self::CALL_ENDED,
            PhoneEvent::CallIncoming(_) => Self::CALL_INCOMING,
        }
    }

    /// JSON encoding of the payload alone
    pub fn payload_json(&self) -> Result<String> {
        let json = match self {
            PhoneEvent::StatusChange(e) => serde_json::to_string(e),
            PhoneEvent::CallConnected(e) => serde_json::to_string(e),
            PhoneEvent::CallEnded(e) => serde_json::to_string(e),
            PhoneEvent::CallIncoming(e) => serde_json::to_string(e),
        };
        json.map_err(DomainError::from)
    }

    /// Rebuild an event from its wire name and JSON payload
    #[cfg(test)]
    pub fn from_parts(event_type: &str, data: &str) -> Result<Self> {
        let event = match event_type {
            Self::STATUS_CHANGE => PhoneEvent::StatusChange(serde_json::from_str(data)?),
            Self::CALL_CONNECTED => PhoneEvent::CallConnected(serde_json::from_str(data)?),
            Self::CALL_ENDED => PhoneEvent::CallEnded(serde_json::from_str(data)?),
            Self::CALL_INCOMING => PhoneEvent::CallIncoming(serde_json::from_str(data)?),
            other => return Err(DomainError::UnknownEvent(other.to_string())),
        };
        Ok(event)
    }
}
