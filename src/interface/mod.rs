//! Interface layer - External interfaces
//!
//! This layer handles:
//! - REST command endpoints
//! - Server-Sent Events streaming
//! - Request/response formatting
//! - Prometheus metrics export

pub mod api;
