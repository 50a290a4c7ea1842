//! API Router configuration

use super::commands_handler::{answer, dial, hangup, logout, set_operator_status};
use super::events_handler::events_handler;
use super::metrics_handler::metrics_handler;
use super::status_handler::{get_state, health_check};
use super::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the API router
///
/// `/metrics` is only mounted when a Prometheus handle is supplied.
pub fn build_router(state: AppState, prometheus_handle: Option<PrometheusHandle>) -> Router {
    // Health check route
    let health_routes = Router::new().route("/health", get(health_check));

    // Call control routes
    let call_routes = Router::new()
        .route("/api/sip/call/dial", post(dial))
        .route("/api/sip/call/answer", post(answer))
        .route("/api/sip/call/hangup", post(hangup))
        .route("/api/sip/operator/status", post(set_operator_status))
        .route("/api/auth/logout", post(logout));

    // Observer routes
    let observer_routes = Router::new()
        .route("/api/sip/events", get(events_handler))
        .route("/api/sip/state", get(get_state));

    let mut router = Router::new()
        .merge(health_routes)
        .merge(call_routes)
        .merge(observer_routes)
        .with_state(state);

    // Metrics route (separate state)
    if let Some(handle) = prometheus_handle {
        let metrics_routes = Router::new()
            .route("/metrics", get(metrics_handler))
            .with_state(handle);
        router = router.merge(metrics_routes);
    }

    router
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}
