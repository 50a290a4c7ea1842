//! Metric recording helpers
//!
//! Names are described and exported by
//! [`crate::interface::api::metrics_handler`]. Recording is a no-op until a
//! recorder is installed, which keeps unit tests free of global state.

use metrics::{counter, gauge};

pub const COMMANDS_TOTAL: &str = "callcast_commands_total";
pub const EVENTS_PUBLISHED_TOTAL: &str = "callcast_events_published_total";
pub const SUBSCRIBERS: &str = "callcast_subscribers";

/// Record a command entering the state machine
pub fn record_command(command: &'static str) {
    counter!(COMMANDS_TOTAL, "command" => command).increment(1);
}

/// Record an event handed to the bus
pub fn record_event_published(event: &'static str) {
    counter!(EVENTS_PUBLISHED_TOTAL, "event" => event).increment(1);
}

/// Update the connected subscribers gauge
pub fn update_subscribers(count: usize) {
    gauge!(SUBSCRIBERS).set(count as f64);
}
