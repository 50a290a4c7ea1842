//! Callcast - a real-time call-state broadcaster
//!
//! Simulates a telephony signaling backend for an operator console. It
//! tracks at most one active call plus the operator's availability,
//! accepts control commands over HTTP and pushes every state change to
//! all connected observers over Server-Sent Events.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interface;

// Re-export commonly used types
pub use domain::shared::error::DomainError;
pub use domain::shared::error::Result;
