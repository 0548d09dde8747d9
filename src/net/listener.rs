//! TCP listener binding.
//!
//! # Responsibilities
//! - Bind exactly one listener to the configured address
//! - Turn bind failures into diagnostics that name the address
//! - Never retry and never fall back to another port

use std::io::ErrorKind;
use std::net::SocketAddr;

use tokio::net::TcpListener;

use crate::config::ListenerConfig;

/// Error type for listener operations.
#[derive(Debug, thiserror::Error)]
pub enum ListenerError {
    /// Another socket already holds the port.
    #[error("port {} is already in use (bind {addr})", .addr.port())]
    AddrInUse {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// The process may not bind this port (privileged port, sandbox).
    #[error("permission denied binding port {} (bind {addr})", .addr.port())]
    PermissionDenied {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// Any other bind failure, e.g. an address not assigned to this host.
    #[error("failed to bind port {} (bind {addr}): {source}", .addr.port())]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
}

impl ListenerError {
    fn from_io(addr: SocketAddr, source: std::io::Error) -> Self {
        match source.kind() {
            ErrorKind::AddrInUse => ListenerError::AddrInUse { addr, source },
            ErrorKind::PermissionDenied => ListenerError::PermissionDenied { addr, source },
            _ => ListenerError::Bind { addr, source },
        }
    }

    /// Address the launcher attempted to bind.
    pub fn addr(&self) -> SocketAddr {
        match self {
            ListenerError::AddrInUse { addr, .. }
            | ListenerError::PermissionDenied { addr, .. }
            | ListenerError::Bind { addr, .. } => *addr,
        }
    }
}

/// Bind the configured address.
pub async fn bind(config: &ListenerConfig) -> Result<TcpListener, ListenerError> {
    let addr = config.socket_addr();

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| ListenerError::from_io(addr, e))?;

    let local_addr = listener
        .local_addr()
        .map_err(|e| ListenerError::from_io(addr, e))?;

    if local_addr.ip().is_unspecified() {
        tracing::warn!(
            address = %local_addr,
            "Listening on all interfaces; the service is reachable from outside this host"
        );
    }

    tracing::info!(
        address = %local_addr,
        max_in_flight = config.max_in_flight,
        "Listener bound"
    );

    Ok(listener)
}
