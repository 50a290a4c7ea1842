//! Server-Sent Events stream handler
//!
//! Each connection gets its own [`SubscriptionSession`]. Frames are written
//! as `event: <type>` / `data: <json>` pairs. When the client goes away
//! axum drops the stream, which drops the session and unsubscribes it.

use super::AppState;
use crate::application::SubscriptionSession;
use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::{Stream, StreamExt};
use std::convert::Infallible;
use tracing::info;

/// SSE handler
pub async fn events_handler(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let session = SubscriptionSession::open(&state.calls);
    info!(
        subscriber = session.id(),
        subscribers = state.calls.subscriber_count(),
        "SSE client connected"
    );

    let stream = session
        .into_stream()
        .map(|frame| Ok::<_, Infallible>(Event::default().event(frame.event()).data(frame.data())));

    Sse::new(stream).keep_alive(KeepAlive::default())
}
