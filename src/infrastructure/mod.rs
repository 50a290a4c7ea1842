//! Infrastructure layer - event delivery and metrics plumbing

pub mod call_metrics;
pub mod event_bus;

pub use event_bus::{EventBus, EventFrame, SubscriberId, Subscription};
