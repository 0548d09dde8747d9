//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Merge the application router with the launcher's probe routes
//! - Configure HTTP/1.1 and HTTP/2 support (via axum/hyper)
//! - Wire up middleware (tracing, timeout, in-flight limit, request ID)
//! - Serve on the bound listener until shutdown

use std::time::Duration;

use axum::{middleware, Router};
use tokio::net::TcpListener;
use tower::limit::GlobalConcurrencyLimitLayer;
use tower_http::timeout::TimeoutLayer;

use crate::config::LauncherConfig;
use crate::health::probe_router;
use crate::http::inflight::{track_requests, InFlightTracker};
use crate::http::request::with_request_tracing;
use crate::lifecycle::{Lifecycle, ShutdownListener};
use crate::observability::metrics;

/// HTTP server fronting one application.
pub struct HttpServer {
    router: Router,
    in_flight: InFlightTracker,
}

impl HttpServer {
    /// Create a server for `app` with the launcher's middleware and probes.
    ///
    /// Probe paths are matched first; every other request falls through to
    /// `app`. An application that also routes a probe path is shadowed there
    /// instead of conflicting with it.
    pub fn new(config: &LauncherConfig, app: Router, lifecycle: Lifecycle) -> Self {
        let in_flight = InFlightTracker::new();
        let metrics_handle = if config.observability.metrics_enabled {
            metrics::init_metrics()
        } else {
            None
        };

        let router = Self::build_router(
            config,
            probe_router(lifecycle, metrics_handle).fallback_service(app),
            in_flight.clone(),
        );

        Self { router, in_flight }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &LauncherConfig, routes: Router, in_flight: InFlightTracker) -> Router {
        let routes = routes
            .layer(middleware::from_fn_with_state(in_flight, track_requests))
            .layer(GlobalConcurrencyLimitLayer::new(config.listener.max_in_flight))
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )));

        with_request_tracing(routes)
    }

    /// Tracker of requests currently being served.
    pub fn in_flight(&self) -> InFlightTracker {
        self.in_flight.clone()
    }

    /// The complete router, for in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve on `listener` until `shutdown` fires, then wait for open
    /// connections to finish. The listener is closed as soon as the
    /// signal is received.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: ShutdownListener,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.recv().await;
                tracing::info!("HTTP server no longer accepting connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
