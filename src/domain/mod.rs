//! Domain layer - Core telephony state and rules
//!
//! This layer contains:
//! - Aggregates: the active call
//! - Value Objects: call state, operator status, identifiers
//! - State machine: command-driven transitions and the events they emit
//! - Domain Events: what observers are told

pub mod call;
pub mod shared;

// Re-export commonly used types
pub use shared::{DomainError, Result};
