//! Liveness, readiness and metrics routes.
//!
//! - `GET /healthz`: 200 while the process serves requests
//! - `GET /readyz`: 200 only in the `Ready` state, 503 otherwise
//! - `GET /metrics`: Prometheus text, when metrics are enabled

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;

use crate::lifecycle::{Lifecycle, LifecycleState};

pub const LIVENESS_PATH: &str = "/healthz";
pub const READINESS_PATH: &str = "/readyz";
pub const METRICS_PATH: &str = "/metrics";

#[derive(Clone)]
struct ProbeState {
    lifecycle: Lifecycle,
    metrics: Option<PrometheusHandle>,
}

#[derive(Debug, Serialize)]
struct Liveness {
    status: &'static str,
}

#[derive(Debug, Serialize)]
struct Readiness {
    ready: bool,
    state: &'static str,
}

/// Routes reserved by the launcher. They take precedence over application routes.
pub fn probe_router(lifecycle: Lifecycle, metrics: Option<PrometheusHandle>) -> Router {
    let mut router = Router::new()
        .route(LIVENESS_PATH, get(liveness))
        .route(READINESS_PATH, get(readiness));

    if metrics.is_some() {
        router = router.route(METRICS_PATH, get(render_metrics));
    }

    router.with_state(ProbeState { lifecycle, metrics })
}

async fn liveness() -> Json<Liveness> {
    Json(Liveness { status: "alive" })
}

async fn readiness(State(state): State<ProbeState>) -> impl IntoResponse {
    let current = state.lifecycle.current();
    let ready = current == LifecycleState::Ready;
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(Readiness {
            ready,
            state: current.as_str(),
        }),
    )
}

async fn render_metrics(State(state): State<ProbeState>) -> impl IntoResponse {
    match state.metrics {
        Some(handle) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
