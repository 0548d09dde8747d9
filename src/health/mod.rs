//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Orchestrator / HEALTHCHECK
//!     → `service-launcher probe` (client.rs)
//!     → GET /healthz on the main listener (probes.rs)
//!
//! Load balancer
//!     → GET /readyz (probes.rs, reads lifecycle state)
//! ```
//!
//! # Design Decisions
//! - Probes share the application's listener; one socket per process
//! - Readiness flips to 503 as soon as draining starts

pub mod client;
pub mod probes;

pub use client::{probe, ProbeError};
pub use probes::{probe_router, LIVENESS_PATH, METRICS_PATH, READINESS_PATH};
