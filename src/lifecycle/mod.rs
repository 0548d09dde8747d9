//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Validate config → Enter working dir → Build application → Bind → Serve
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop accepting → Drain (bounded) → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//!     Second signal  → Exit immediately
//!
//! State (state.rs):
//!     Building → Starting → Ready → Draining → Stopped | Failed
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal, no retries
//! - Restart on crash is the orchestrator's job
//! - Shutdown has timeout: forced stop after the grace period

pub mod shutdown;
pub mod signals;
pub mod startup;
pub mod state;

pub use shutdown::{Shutdown, ShutdownListener};
pub use startup::{Launcher, RunningService};
pub use state::{Lifecycle, LifecycleState, TransitionError};
