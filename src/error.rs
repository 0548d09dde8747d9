//! Launcher error type and exit code mapping.

use std::path::PathBuf;

use crate::app::ApplicationError;
use crate::config::ConfigError;
use crate::lifecycle::TransitionError;
use crate::net::ListenerError;

/// Exit status for configuration problems (sysexits `EX_CONFIG`).
pub const EXIT_CONFIG: u8 = 78;
/// Exit status for every other failure.
pub const EXIT_FAILURE: u8 = 1;

/// How a failure relates to the process lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The process never reached `Ready`.
    Startup,
    /// The server stopped on its own after it was `Ready`.
    Crash,
}

/// Any failure of the launcher. All of them are fatal.
#[derive(Debug, thiserror::Error)]
pub enum LauncherError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("cannot enter working directory {path:?}: {source}")]
    WorkingDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Application(#[from] ApplicationError),

    #[error(transparent)]
    Bind(#[from] ListenerError),

    #[error("server failed: {0}")]
    Serve(#[source] std::io::Error),

    #[error(transparent)]
    Lifecycle(#[from] TransitionError),
}

impl LauncherError {
    pub fn kind(&self) -> FailureKind {
        match self {
            LauncherError::Serve(_) => FailureKind::Crash,
            _ => FailureKind::Startup,
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            LauncherError::Config(_) => EXIT_CONFIG,
            _ => EXIT_FAILURE,
        }
    }
}
