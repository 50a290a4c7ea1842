//! Call aggregate root

use crate::domain::call::value_object::CallState;
use crate::domain::shared::value_objects::CallId;
use serde::{Deserialize, Serialize};

/// The single tracked call
///
/// `start_time` is a Unix timestamp in milliseconds. It marks call start
/// while dialing or ringing and is reset to the connect time when an
/// incoming call is answered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Call {
    id: CallId,
    phone_number: Option<String>,
    state: CallState,
    start_time: i64,
}

impl Call {
    /// Outbound call placed by the operator
    pub fn dialing(phone_number: Option<String>, now_ms: i64) -> Self {
        Self {
            id: CallId::dialed(),
            phone_number,
            state: CallState::Dialing,
            start_time: now_ms,
        }
    }

    /// Simulated inbound call
    pub fn incoming(phone_number: String, now_ms: i64) -> Self {
        Self {
            id: CallId::incoming(),
            phone_number: Some(phone_number),
            state: CallState::Incoming,
            start_time: now_ms,
        }
    }

    /// Far end picked up; the dial time is kept as start time
    pub fn connect(&mut self) {
        self.state = CallState::Talking;
    }

    /// Operator answered; start time becomes the connect time
    pub fn answer(&mut self, now_ms: i64) {
        self.state = CallState::Talking;
        self.start_time = now_ms;
    }

    // Getters
    pub fn id(&self) -> &CallId {
        &self.id
    }

    pub fn phone_number(&self) -> Option<&str> {
        self.phone_number.as_deref()
    }

    pub fn state(&self) -> CallState {
        self.state
    }

    pub fn start_time(&self) -> i64 {
        self.start_time
    }
}
