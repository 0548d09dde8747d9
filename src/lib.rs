//! Service launcher library.
//!
//! Builds one HTTP application, binds one listener and keeps the process
//! alive until it is told to stop.
//!
//! # Architecture Overview
//!
//! ```text
//!   config (defaults < file < env < flags)
//!        │
//!        ▼
//!   ┌───────────┐   resolve    ┌─────────────┐
//!   │ lifecycle │─────────────▶│ app registry│
//!   │  startup  │              └──────┬──────┘
//!   └─────┬─────┘                     │ Router
//!         │ bind                      ▼
//!   ┌─────▼─────┐   accept    ┌──────────────┐
//!   │    net    │────────────▶│ http server  │──▶ application routes
//!   │ listener  │             │ + middleware │──▶ /healthz /readyz /metrics
//!   └───────────┘             └──────────────┘
//!         ▲
//!   SIGTERM/SIGINT → shutdown → bounded drain → exit
//! ```

pub mod app;
pub mod config;
pub mod error;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;

pub use app::{AppContext, Application, ApplicationError, Registry};
pub use config::LauncherConfig;
pub use error::{FailureKind, LauncherError};
pub use http::HttpServer;
pub use lifecycle::{Launcher, Lifecycle, LifecycleState, RunningService, Shutdown};
