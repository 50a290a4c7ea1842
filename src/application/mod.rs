//! Application layer - Use cases and application services
//!
//! This layer orchestrates the domain state machine:
//! - Serializing every transition through one state lock
//! - Publishing domain events to observers
//! - Snapshotting state for newly attached observers
//! - Driving timer-issued transitions

pub mod call_service;
pub mod session;
pub mod timer;

pub use call_service::CallService;
pub use session::SubscriptionSession;
pub use timer::TimerEngine;
