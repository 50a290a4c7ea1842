//! Shared kernel - Common types used across the call context

pub mod error;
pub mod value_objects;

pub use error::DomainError;
pub use error::Result;
pub use value_objects::*;
