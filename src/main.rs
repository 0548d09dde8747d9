//! `service-launcher` binary.
//!
//! ```text
//! service-launcher [OPTIONS] [serve]      run the service (default)
//! service-launcher [OPTIONS] check-config print the effective configuration
//! service-launcher [OPTIONS] probe        exit 0 if /healthz answers 2xx
//! service-launcher apps                   list registered applications
//! ```

use std::net::IpAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};

use service_launcher::config::env::ENV_CONFIG;
use service_launcher::config::{resolve_config, validate_config, ConfigError, LauncherConfig};
use service_launcher::error::{EXIT_CONFIG, EXIT_FAILURE};
use service_launcher::health::{probe, LIVENESS_PATH};
use service_launcher::observability::init_logging;
use service_launcher::{Launcher, Registry};

#[derive(Parser)]
#[command(name = "service-launcher", version)]
#[command(about = "Start one HTTP application on one port and keep it running", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long, env = ENV_CONFIG, global = true)]
    config: Option<PathBuf>,

    /// Interface to bind (overrides file and environment).
    #[arg(long, global = true)]
    host: Option<IpAddr>,

    /// Port to bind (overrides file and environment).
    #[arg(short, long, global = true)]
    port: Option<u16>,

    /// Working directory to enter before starting the application.
    #[arg(long, global = true)]
    workdir: Option<PathBuf>,

    /// Registered application to serve.
    #[arg(long, global = true)]
    app: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the service until SIGTERM or SIGINT
    Serve,
    /// Validate and print the effective configuration
    CheckConfig,
    /// Check the liveness endpoint of a running instance
    Probe {
        /// Full URL to probe (default: local listener's /healthz).
        #[arg(long)]
        url: Option<String>,

        #[arg(long, default_value_t = 3)]
        timeout_secs: u64,
    },
    /// List registered applications
    Apps,
}

impl Cli {
    /// Defaults < file < `LAUNCHER_*` (via `lookup`) < flags.
    fn effective_config<F>(&self, lookup: F) -> Result<LauncherConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = resolve_config(self.config.as_deref(), lookup)?;

        if let Some(host) = self.host {
            config.listener.host = host;
        }
        if let Some(port) = self.port {
            config.listener.port = port;
        }
        if let Some(dir) = &self.workdir {
            config.process.working_dir = Some(dir.clone());
        }
        if let Some(app) = &self.app {
            config.app.name = app.clone();
        }

        Ok(config)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let registry = Registry::builtin();

    let config = match cli.effective_config(|key| std::env::var(key).ok()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config, registry).await,
        Commands::CheckConfig => check_config(&config),
        Commands::Probe { url, timeout_secs } => {
            run_probe(&config, url, Duration::from_secs(timeout_secs)).await
        }
        Commands::Apps => {
            for name in registry.names() {
                println!("{name}");
            }
            ExitCode::SUCCESS
        }
    }
}

async fn serve(config: LauncherConfig, registry: Registry) -> ExitCode {
    init_logging(&config.observability);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        address = %config.listener.socket_addr(),
        application = %config.app.name,
        grace_period_secs = config.shutdown.grace_period_secs,
        "service-launcher starting"
    );

    match Launcher::new(config, registry).run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, kind = ?e.kind(), "Exiting after fatal error");
            ExitCode::from(e.exit_code())
        }
    }
}

fn check_config(config: &LauncherConfig) -> ExitCode {
    if let Err(errors) = validate_config(config) {
        for error in errors {
            eprintln!("error: {error}");
        }
        return ExitCode::from(EXIT_CONFIG);
    }

    match toml::to_string_pretty(config) {
        Ok(rendered) => {
            print!("{rendered}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: cannot render configuration: {e}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

/// Liveness URL of the local listener described by `config`.
fn liveness_url(config: &LauncherConfig) -> String {
    let host = match config.listener.host {
        ip if ip.is_unspecified() => "127.0.0.1".to_string(),
        IpAddr::V4(ip) => ip.to_string(),
        IpAddr::V6(ip) => format!("[{ip}]"),
    };
    format!("http://{host}:{}{LIVENESS_PATH}", config.listener.port)
}

async fn run_probe(config: &LauncherConfig, url: Option<String>, timeout: Duration) -> ExitCode {
    let url = url.unwrap_or_else(|| liveness_url(config));

    match probe(&url, timeout).await {
        Ok(status) => {
            println!("{url}: {status}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn vars(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn flags_override_environment_and_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"[listener]\nport = 8100\n\n[app]\nname = \"status\"\n")
            .unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let cli = Cli::parse_from([
            "service-launcher",
            "--config",
            path.as_str(),
            "--port",
            "9000",
            "--app",
            "echo",
            "serve",
        ]);
        let config = cli
            .effective_config(vars(&[("LAUNCHER_PORT", "8200"), ("LAUNCHER_APP", "status")]))
            .unwrap();

        assert_eq!(config.listener.port, 9000);
        assert_eq!(config.app.name, "echo");
    }

    #[test]
    fn environment_applies_when_no_flag_given() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"[listener]\nport = 8100\n").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let cli = Cli::parse_from(["service-launcher", "--config", path.as_str()]);
        let config = cli
            .effective_config(vars(&[("LAUNCHER_PORT", "8200")]))
            .unwrap();

        assert_eq!(config.listener.port, 8200);
        assert!(cli.command.is_none());
    }

    #[test]
    fn malformed_environment_is_a_config_error() {
        let cli = Cli::parse_from(["service-launcher", "check-config"]);
        let err = cli
            .effective_config(vars(&[("LAUNCHER_PORT", "eighty")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Env { .. }));
    }

    #[test]
    fn liveness_url_targets_loopback_for_wildcard_host() {
        let mut config = LauncherConfig::default();
        assert_eq!(liveness_url(&config), "http://127.0.0.1:8051/healthz");

        config.listener.host = "10.0.0.5".parse().unwrap();
        config.listener.port = 9000;
        assert_eq!(liveness_url(&config), "http://10.0.0.5:9000/healthz");

        config.listener.host = "::1".parse().unwrap();
        assert_eq!(liveness_url(&config), "http://[::1]:9000/healthz");
    }
}
