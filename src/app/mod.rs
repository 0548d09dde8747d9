//! Application objects served by the launcher.
//!
//! # Data Flow
//! ```text
//! app.name (config)
//!     → Registry::resolve (registry.rs)
//!     → Application::router(&AppContext)
//!     → axum Router handed to the HTTP server
//! ```
//!
//! The launcher owns the process and the socket. Everything behind the
//! returned router (routes, payloads, status codes) belongs to the
//! application.

pub mod echo;
pub mod registry;
pub mod status;

use std::collections::BTreeMap;
use std::path::PathBuf;

use axum::Router;

pub use echo::EchoApp;
pub use registry::Registry;
pub use status::StatusApp;

/// Error raised while locating or building an application.
#[derive(Debug, thiserror::Error)]
pub enum ApplicationError {
    #[error("application '{name}' is not registered (available: {})", .available.join(", "))]
    NotFound { name: String, available: Vec<String> },

    #[error("application '{name}' failed to build: {reason}")]
    Build { name: String, reason: String },
}

/// What an application sees of the launcher when it is built.
#[derive(Debug, Clone, Default)]
pub struct AppContext {
    /// Registry name the application was resolved under.
    pub name: String,
    /// Working directory of the process.
    pub working_dir: PathBuf,
    /// Opaque `[app.settings]` from the configuration.
    pub settings: BTreeMap<String, String>,
}

impl AppContext {
    pub fn setting(&self, key: &str) -> Option<&str> {
        self.settings.get(key).map(String::as_str)
    }
}

/// An application object: a named factory for the request router.
pub trait Application: Send + Sync + 'static {
    /// Name used for registry lookup.
    fn name(&self) -> &str;

    /// Build the router that handles every non-launcher request.
    fn router(&self, ctx: &AppContext) -> Result<Router, ApplicationError>;
}
