//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! ListenerConfig (host, port)
//!     → listener.rs (bind once, diagnose failures)
//!     → Hand off to HTTP layer
//! ```
//!
//! # Design Decisions
//! - One listener per process, owned by the server task
//! - Bind errors are fatal; no retry, no alternate port

pub mod listener;

pub use listener::{bind, ListenerError};
