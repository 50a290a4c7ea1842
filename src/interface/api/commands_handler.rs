//! Command API handlers
//!
//! Each endpoint maps one request onto one state machine command. Bodies
//! are parsed leniently: missing or malformed fields become absent values.

use super::call_dto::{parse_body, CallActionRequest, CommandResponse, DialRequest, StatusRequest};
use super::AppState;
use crate::domain::call::Command;
use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use tracing::{debug, info};

/// Place an outbound call
pub async fn dial(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<CommandResponse>, StatusCode> {
    let req: DialRequest = parse_body(&body);
    info!("API: Dialing {}", req.phone.as_deref().unwrap_or("<none>"));

    state.calls.execute(req.into());
    Ok(Json(CommandResponse::ok()))
}

/// Answer the active call
pub async fn answer(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<CommandResponse>, StatusCode> {
    let req: CallActionRequest = parse_body(&body);
    info!("API: Answering call");
    debug!("Answer requested for call_id {:?}", req.call_id);

    state.calls.execute(Command::Answer);
    Ok(Json(CommandResponse::ok()))
}

/// Hang up the active call
pub async fn hangup(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<CommandResponse>, StatusCode> {
    let req: CallActionRequest = parse_body(&body);
    info!("API: Hanging up call");
    debug!("Hangup requested for call_id {:?}", req.call_id);

    state.calls.execute(Command::Hangup);
    Ok(Json(CommandResponse::ok()))
}

/// Set operator availability
pub async fn set_operator_status(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<CommandResponse>, StatusCode> {
    let req: StatusRequest = parse_body(&body);
    info!("API: Setting operator status to {:?}", req.status);

    state.calls.execute(req.into());
    Ok(Json(CommandResponse::ok()))
}

/// Log the operator out
pub async fn logout(
    State(state): State<AppState>,
) -> Result<Json<CommandResponse>, StatusCode> {
    info!("API: Logging out operator");

    state.calls.execute(Command::Logout);
    Ok(Json(CommandResponse::ok()))
}
