//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults (schema.rs)
//!     → config file, TOML (loader.rs)
//!     → LAUNCHER_* variables (env.rs)
//!     → CLI flags (main.rs)
//!     → validation.rs (semantic checks)
//!     → LauncherConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup; there is no reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod env;
pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, resolve_config, ConfigError};
pub use schema::{
    AppConfig, LauncherConfig, ListenerConfig, LogFormat, ObservabilityConfig, ProcessConfig,
    ShutdownConfig, TimeoutConfig, DEFAULT_PORT,
};
pub use validation::{validate_config, ValidationError};
