//! Call state machine
//!
//! [`PhoneState`] is the `{operator status, active call}` pair. All
//! mutation goes through [`PhoneState::apply`], which computes the next
//! state and the events describing it in one step. It does no I/O and no
//! locking; callers serialize access.

use crate::domain::call::aggregate::Call;
use crate::domain::call::command::Command;
use crate::domain::call::event::PhoneEvent;
use crate::domain::call::value_object::{CallState, OperatorStatus};
use crate::domain::shared::value_objects::CallId;
use serde::Serialize;

/// Work to schedule once the transition has been committed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FollowUp {
    /// Issue `ConnectCall` for this id after the connect delay
    ConnectAfterDelay(CallId),
}

/// Outcome of applying one command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transition {
    pub events: Vec<PhoneEvent>,
    pub follow_up: Option<FollowUp>,
}

impl Transition {
    fn none() -> Self {
        Self::default()
    }

    fn emit(event: PhoneEvent) -> Self {
        Self {
            events: vec![event],
            follow_up: None,
        }
    }

    /// True when the command changed nothing observable
    pub fn is_noop(&self) -> bool {
        self.events.is_empty() && self.follow_up.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PhoneState {
    operator_status: OperatorStatus,
    active_call: Option<Call>,
}

impl PhoneState {
    pub fn new(operator_status: OperatorStatus) -> Self {
        Self {
            operator_status,
            active_call: None,
        }
    }

    pub fn operator_status(&self) -> &OperatorStatus {
        &self.operator_status
    }

    pub fn active_call(&self) -> Option<&Call> {
        self.active_call.as_ref()
    }

    /// Apply a command at time `now_ms` (Unix milliseconds)
    pub fn apply(&mut self, command: Command, now_ms: i64) -> Transition {
        match command {
            Command::Dial { phone } => {
                // An active call is replaced without notice; the command
                // source is expected not to dial during a call.
                let call = Call::dialing(phone, now_ms);
                let id = call.id().clone();
                self.active_call = Some(call);
                Transition {
                    events: Vec::new(),
                    follow_up: Some(FollowUp::ConnectAfterDelay(id)),
                }
            }
            Command::ConnectCall { call_id } => match self.active_call.as_mut() {
                Some(call) if *call.id() == call_id => {
                    call.connect();
                    Transition::emit(PhoneEvent::call_connected(call))
                }
                _ => Transition::none(),
            },
            Command::Answer => match self.active_call.as_mut() {
                Some(call) => {
                    call.answer(now_ms);
                    Transition::emit(PhoneEvent::call_connected(call))
                }
                None => Transition::none(),
            },
            Command::Hangup => {
                self.active_call = None;
                Transition::emit(PhoneEvent::call_ended())
            }
            Command::SetOperatorStatus { status } => {
                self.operator_status = status;
                Transition::emit(PhoneEvent::status_change(self.operator_status.clone()))
            }
            Command::Logout => {
                self.active_call = None;
                self.operator_status = OperatorStatus::Offline;
                Transition::emit(PhoneEvent::status_change(OperatorStatus::Offline))
            }
            Command::AutoIncoming { number } => {
                if self.active_call.is_some() {
                    return Transition::none();
                }
                let call = Call::incoming(number, now_ms);
                let event = PhoneEvent::call_incoming(&call);
                self.active_call = Some(call);
                Transition::emit(event)
            }
        }
    }

    /// Events that bring a fresh observer up to date
    ///
    /// Always a `status_change`, then `call_incoming` for a ringing
    /// inbound call or `call_connected` for any other active call.
    /// Dialing is reported as connected.
    pub fn snapshot_events(&self) -> Vec<PhoneEvent> {
        let mut events = vec![PhoneEvent::status_change(self.operator_status.clone())];
        if let Some(call) = &self.active_call {
            events.push(match call.state() {
                CallState::Incoming => PhoneEvent::call_incoming(call),
                CallState::Dialing | CallState::Talking => PhoneEvent::call_connected(call),
            });
        }
        events
    }
}
