//! API interface implementations

pub mod call_dto;
pub mod commands_handler;
pub mod events_handler;
pub mod metrics_handler;
pub mod router;
pub mod status_handler;

use crate::application::CallService;
use std::sync::Arc;

pub use metrics_handler::init_metrics;
pub use router::build_router;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub calls: Arc<CallService>,
}

impl AppState {
    pub fn new(calls: Arc<CallService>) -> Self {
        Self { calls }
    }
}
