//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events on stdout)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → Container log driver (stdout)
//!     → Metrics endpoint (Prometheus scrape of /metrics)
//! ```

pub mod logging;
pub mod metrics;

pub use logging::init_logging;
