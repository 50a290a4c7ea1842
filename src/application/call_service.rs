//! Call state service
//!
//! Owns the single [`PhoneState`] behind one mutex. A command is applied
//! and its events are enqueued on the bus while that mutex is held, so
//! observers see transitions in the order they were committed. Enqueueing
//! never blocks (subscriber queues are unbounded); the socket writes
//! happen later in each subscriber's own task.

use crate::application::timer::TimerEngine;
use crate::config::SimulatorConfig;
use crate::domain::call::{Command, FollowUp, OperatorStatus, PhoneState, Transition};
use crate::infrastructure::call_metrics as metrics;
use crate::infrastructure::event_bus::{EventBus, EventFrame, Subscription};
use chrono::Utc;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::{debug, info, warn};

pub struct CallService {
    state: Mutex<PhoneState>,
    bus: Arc<EventBus>,
    connect_delay: Duration,
}

impl CallService {
    pub fn new(config: &SimulatorConfig) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(PhoneState::new(OperatorStatus::parse(&config.initial_status))),
            bus: EventBus::new(),
            connect_delay: config.connect_delay(),
        })
    }

    fn lock_state(&self) -> MutexGuard<'_, PhoneState> {
        // apply() mutates in a single step, so a poisoned state is still
        // consistent.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply a command and publish what it produced
    ///
    /// Must be called from within a Tokio runtime: a dial schedules its
    /// connect timer here.
    pub fn execute(self: &Arc<Self>, command: Command) -> Transition {
        let name = command.name();
        let timer_issued = command.is_timer_issued();
        metrics::record_command(name);

        let (transition, call_state) = {
            let mut state = self.lock_state();
            let transition = state.apply(command, Utc::now().timestamp_millis());
            for event in &transition.events {
                self.bus.publish(event);
            }
            let call_state = state.active_call().map_or("idle", |call| call.state().as_str());
            (transition, call_state)
        };

        if timer_issued {
            debug!(
                command = name,
                call_state,
                events = transition.events.len(),
                "Timer command applied"
            );
        } else {
            info!(
                command = name,
                call_state,
                events = transition.events.len(),
                "Command applied"
            );
        }

        if let Some(FollowUp::ConnectAfterDelay(call_id)) = &transition.follow_up {
            TimerEngine::schedule_connect(self, call_id.clone(), self.connect_delay);
        }

        transition
    }

    /// Register a subscriber and capture the current state for it
    ///
    /// Both happen under the state lock: every transition is either in the
    /// returned snapshot or will arrive on the subscription, never both.
    pub fn attach(&self) -> (Subscription, Vec<EventFrame>) {
        let state = self.lock_state();
        let subscription = self.bus.subscribe();
        let snapshot = state
            .snapshot_events()
            .iter()
            .filter_map(|event| match EventFrame::encode(event) {
                Ok(frame) => Some(frame),
                Err(e) => {
                    warn!("Failed to serialize snapshot {} event: {}", event.event_type(), e);
                    None
                }
            })
            .collect();
        (subscription, snapshot)
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> PhoneState {
        self.lock_state().clone()
    }

    pub fn subscriber_count(&self) -> usize {
        self.bus.subscriber_count()
    }
}
