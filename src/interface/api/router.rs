//! API Router configuration

use super::directory_handler::{health_check, list_agents};
use super::metrics_handler::metrics_handler;
use crate::application::Switchboard;
use crate::interface::gateway::ws_handler;
use axum::{routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the HTTP + WebSocket router
pub fn build_router(switchboard: Switchboard, prometheus_handle: PrometheusHandle) -> Router {
    let switchboard_routes = Router::new()
        .route("/health", get(health_check))
        .route("/api/agents", get(list_agents))
        .route("/ws", get(ws_handler))
        .with_state(switchboard);

    // Metrics route (separate state)
    let metrics_routes = Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(prometheus_handle);

    Router::new()
        .merge(switchboard_routes)
        .merge(metrics_routes)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}
