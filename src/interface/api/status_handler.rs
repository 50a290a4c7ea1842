//! Read-only state and health handlers

use super::call_dto::{CommandResponse, StateResponse};
use super::AppState;
use axum::{extract::State, Json};

/// Health check
pub async fn health_check() -> Json<CommandResponse> {
    Json(CommandResponse::ok())
}

/// Current operator status and active call
pub async fn get_state(State(state): State<AppState>) -> Json<StateResponse> {
    Json(StateResponse::new(
        state.calls.snapshot(),
        state.calls.subscriber_count(),
    ))
}
