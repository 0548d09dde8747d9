//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, HTTP/1.1 + HTTP/2)
//!     → request.rs (request ID, tracing span)
//!     → inflight.rs (in-flight count, request metrics)
//!     → application router or probe routes
//! ```

pub mod inflight;
pub mod request;
pub mod server;

pub use inflight::InFlightTracker;
pub use request::{RequestIdExt, X_REQUEST_ID};
pub use server::HttpServer;
