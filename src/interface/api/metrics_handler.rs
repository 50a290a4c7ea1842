//! Prometheus metrics handler

use crate::infrastructure::call_metrics::{COMMANDS_TOTAL, EVENTS_PUBLISHED_TOTAL, SUBSCRIBERS};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use metrics::{describe_counter, describe_gauge};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

/// Install the global Prometheus recorder
///
/// Can succeed only once per process.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    describe_counter!(COMMANDS_TOTAL, "Commands applied to the call state machine");
    describe_counter!(EVENTS_PUBLISHED_TOTAL, "Events published to observers");
    describe_gauge!(SUBSCRIBERS, "Currently attached event stream subscribers");

    Ok(handle)
}

/// HTTP metrics handler
pub async fn metrics_handler(State(prometheus_handle): State<PrometheusHandle>) -> Response {
    let metrics = prometheus_handle.render();
    (StatusCode::OK, metrics).into_response()
}
