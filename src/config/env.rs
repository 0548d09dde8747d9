//! Environment variable overrides.
//!
//! Every value the launcher needs can be supplied as a `LAUNCHER_*`
//! variable. A malformed value is an error; it never falls back to the
//! file or default value.

use std::path::PathBuf;
use std::str::FromStr;

use crate::config::loader::ConfigError;
use crate::config::schema::{LauncherConfig, LogFormat};

pub const ENV_CONFIG: &str = "LAUNCHER_CONFIG";
pub const ENV_HOST: &str = "LAUNCHER_HOST";
pub const ENV_PORT: &str = "LAUNCHER_PORT";
pub const ENV_WORKDIR: &str = "LAUNCHER_WORKDIR";
pub const ENV_APP: &str = "LAUNCHER_APP";
pub const ENV_SHUTDOWN_GRACE_SECS: &str = "LAUNCHER_SHUTDOWN_GRACE_SECS";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "LAUNCHER_REQUEST_TIMEOUT_SECS";
pub const ENV_LOG_FORMAT: &str = "LAUNCHER_LOG_FORMAT";

/// Overlay `LAUNCHER_*` values found through `lookup` onto `config`.
pub fn apply_env<F>(config: &mut LauncherConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(host) = parsed(&lookup, ENV_HOST)? {
        config.listener.host = host;
    }
    if let Some(port) = parsed(&lookup, ENV_PORT)? {
        config.listener.port = port;
    }
    if let Some(dir) = lookup(ENV_WORKDIR).filter(|v| !v.is_empty()) {
        config.process.working_dir = Some(PathBuf::from(dir));
    }
    if let Some(app) = lookup(ENV_APP).filter(|v| !v.is_empty()) {
        config.app.name = app;
    }
    if let Some(secs) = parsed(&lookup, ENV_SHUTDOWN_GRACE_SECS)? {
        config.shutdown.grace_period_secs = secs;
    }
    if let Some(secs) = parsed(&lookup, ENV_REQUEST_TIMEOUT_SECS)? {
        config.timeouts.request_secs = secs;
    }
    if let Some(format) = parsed::<LogFormat, _>(&lookup, ENV_LOG_FORMAT)? {
        config.observability.log_format = format;
    }
    Ok(())
}

fn parsed<T, F>(lookup: &F, var: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    let Some(value) = lookup(var) else {
        return Ok(None);
    };
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse()
        .map(Some)
        .map_err(|e: T::Err| ConfigError::Env {
            var,
            value: value.clone(),
            reason: e.to_string(),
        })
}
