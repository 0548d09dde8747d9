//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the launcher.
//! All types derive Serde traits for deserialization from config files, and
//! every section carries defaults so an empty file is a valid configuration.

use std::collections::BTreeMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Port the launcher binds when nothing else is configured.
pub const DEFAULT_PORT: u16 = 8051;

/// Root configuration for the service launcher.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct LauncherConfig {
    /// Listener configuration (host, port, in-flight limit).
    pub listener: ListenerConfig,

    /// Process-level settings (working directory).
    pub process: ProcessConfig,

    /// Application selection and its opaque settings.
    pub app: AppConfig,

    /// Stop behaviour.
    pub shutdown: ShutdownConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
///
/// The default host is `0.0.0.0`: the service is reachable from outside the
/// container's network namespace, and from every interface of the host when
/// run outside a container. Set `host = "127.0.0.1"` to restrict it.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Interface to bind.
    pub host: IpAddr,

    /// TCP port to bind. Never zero.
    pub port: u16,

    /// Maximum requests processed concurrently (backpressure).
    pub max_in_flight: usize,
}

impl ListenerConfig {
    /// Socket address the listener binds.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            max_in_flight: 10_000,
        }
    }
}

/// Process-level settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct ProcessConfig {
    /// Directory to enter before the application is built.
    /// `None` keeps the directory the process was started in.
    pub working_dir: Option<PathBuf>,
}

/// Application selection.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Registry name of the application to serve.
    pub name: String,

    /// Opaque key/value settings handed to the application.
    pub settings: BTreeMap<String, String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: "status".to_string(),
            settings: BTreeMap::new(),
        }
    }
}

/// Stop behaviour.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ShutdownConfig {
    /// How long in-flight requests may drain after a stop request.
    /// Zero means stop immediately.
    pub grace_period_secs: u64,
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            grace_period_secs: 10,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable, for terminals.
    #[default]
    Pretty,
    /// One JSON object per line, for log collectors.
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{other}', expected 'pretty' or 'json'")),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log filter used when `RUST_LOG` is unset.
    pub log_filter: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Serve Prometheus metrics at `/metrics` on the main listener.
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_filter: "service_launcher=info,tower_http=info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: true,
        }
    }
}
