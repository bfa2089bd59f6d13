//! Intake HTTP server for the order integration service.
//!
//! Exposes the order submit endpoint the OMS calls, plus health and
//! Prometheus metrics. The submit handler validates and schedules; all
//! downstream work happens in background saga tasks.

pub mod config;
pub mod error;
pub mod routes;
pub mod spawner;
pub mod workflow;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::orders::AppState;
use spawner::SagaSpawner;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<W: SagaSpawner + 'static>(
    state: Arc<AppState<W>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::system::metrics))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::system::health))
        .route("/v1/orders", post(routes::orders::submit::<W>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}
