//! Configuration loading from disk and from the environment.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::env::apply_env;
use crate::config::schema::LauncherConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value {value:?} for {var}: {reason}")]
    Env {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse a TOML file without validating it.
pub fn read_config_file(path: &Path) -> Result<LauncherConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<LauncherConfig, ConfigError> {
    let config = read_config_file(path)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Resolve the effective configuration: defaults, then the optional file,
/// then `LAUNCHER_*` variables looked up through `lookup`.
///
/// The result is not validated so that callers can still apply CLI
/// overrides; call [`validate_config`] afterwards.
pub fn resolve_config<F>(path: Option<&Path>, lookup: F) -> Result<LauncherConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => read_config_file(path)?,
        None => LauncherConfig::default(),
    };
    apply_env(&mut config, lookup)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn load_config_reads_and_validates() {
        let file = write_config("[listener]\nport = 9000\n");
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.listener.port, 9000);
    }

    #[test]
    fn load_config_rejects_invalid_values() {
        let file = write_config("[listener]\nport = 0\n");
        let err = load_config(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref errors) if errors.len() == 1));
        assert!(err.to_string().contains("listener.port"));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_config(Path::new("/nonexistent/launcher.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let file = write_config("[listener\nport = ");
        let err = load_config(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn environment_overrides_file() {
        let file = write_config("[listener]\nport = 9000\n");
        let env: HashMap<&str, &str> = [("LAUNCHER_PORT", "9100")].into_iter().collect();

        let config =
            resolve_config(Some(file.path()), |key| env.get(key).map(|v| v.to_string())).unwrap();
        assert_eq!(config.listener.port, 9100);
    }

    #[test]
    fn no_file_starts_from_defaults() {
        let config = resolve_config(None, |_| None).unwrap();
        assert_eq!(config, LauncherConfig::default());
    }
}
