//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (port non-zero, timeouts > 0)
//! - Reject settings that would make the launcher silently pick a value
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: LauncherConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use crate::config::schema::LauncherConfig;

/// Upper bound on the drain period.
pub const MAX_GRACE_PERIOD_SECS: u64 = 300;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &LauncherConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.port == 0 {
        errors.push(ValidationError::new(
            "listener.port",
            "must be between 1 and 65535; port 0 would bind a random port",
        ));
    }

    if config.listener.max_in_flight == 0 {
        errors.push(ValidationError::new(
            "listener.max_in_flight",
            "must be greater than 0",
        ));
    }

    if let Some(dir) = &config.process.working_dir {
        if dir.as_os_str().is_empty() {
            errors.push(ValidationError::new(
                "process.working_dir",
                "must not be empty when set",
            ));
        }
    }

    if config.app.name.trim().is_empty() {
        errors.push(ValidationError::new("app.name", "must not be empty"));
    }

    if config.shutdown.grace_period_secs > MAX_GRACE_PERIOD_SECS {
        errors.push(ValidationError::new(
            "shutdown.grace_period_secs",
            format!("must be at most {MAX_GRACE_PERIOD_SECS}"),
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new(
            "timeouts.request_secs",
            "must be greater than 0",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&LauncherConfig::default()).is_ok());
    }

    #[test]
    fn port_zero_is_rejected() {
        let mut config = LauncherConfig::default();
        config.listener.port = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "listener.port");
    }

    #[test]
    fn collects_every_error() {
        let mut config = LauncherConfig::default();
        config.listener.port = 0;
        config.listener.max_in_flight = 0;
        config.process.working_dir = Some(PathBuf::new());
        config.app.name = "  ".to_string();
        config.shutdown.grace_period_secs = MAX_GRACE_PERIOD_SECS + 1;
        config.timeouts.request_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "listener.port",
                "listener.max_in_flight",
                "process.working_dir",
                "app.name",
                "shutdown.grace_period_secs",
                "timeouts.request_secs",
            ]
        );
    }

    #[test]
    fn zero_grace_period_means_immediate_stop() {
        let mut config = LauncherConfig::default();
        config.shutdown.grace_period_secs = 0;
        assert!(validate_config(&config).is_ok());
    }
}
