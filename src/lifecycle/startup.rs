//! Startup orchestration.
//!
//! # Responsibilities
//! - Validate configuration
//! - Enter the working directory
//! - Resolve and build the application
//! - Bind the listener and begin accepting traffic
//! - Drain and stop when shutdown is triggered
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal and marks the process Failed
//! - Steps run in order, not concurrently
//! - The listener binds last (traffic only when the application is built)

use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::app::{AppContext, Registry};
use crate::config::{validate_config, ConfigError, LauncherConfig};
use crate::error::LauncherError;
use crate::http::{HttpServer, InFlightTracker};
use crate::lifecycle::signals::spawn_signal_listener;
use crate::lifecycle::{Lifecycle, LifecycleState, Shutdown, ShutdownListener};
use crate::net;

/// Starts one application on one listener and stops it on request.
pub struct Launcher {
    config: LauncherConfig,
    registry: Registry,
    lifecycle: Lifecycle,
    shutdown: Shutdown,
}

impl Launcher {
    pub fn new(config: LauncherConfig, registry: Registry) -> Self {
        Self {
            config,
            registry,
            lifecycle: Lifecycle::new(),
            shutdown: Shutdown::new(),
        }
    }

    /// Handle observing this launcher's state.
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle.clone()
    }

    /// Handle that stops this launcher when triggered.
    pub fn shutdown(&self) -> Shutdown {
        self.shutdown.clone()
    }

    /// Start serving, then block until a stop signal arrives and the
    /// drain completes.
    pub async fn run(self) -> Result<(), LauncherError> {
        let signals = spawn_signal_listener(self.shutdown.clone());
        let result = match self.start().await {
            Ok(service) => service.wait().await,
            Err(e) => Err(e),
        };
        signals.abort();
        result
    }

    /// Bring the service to `Ready` and return a handle to it.
    pub async fn start(self) -> Result<RunningService, LauncherError> {
        match self.try_start().await {
            Ok(service) => Ok(service),
            Err(e) => {
                self.lifecycle.fail();
                tracing::error!(error = %e, "Startup failed");
                Err(e)
            }
        }
    }

    async fn try_start(&self) -> Result<RunningService, LauncherError> {
        let config = &self.config;
        validate_config(config)
            .map_err(|errors| LauncherError::Config(ConfigError::Validation(errors)))?;

        let working_dir = enter_working_dir(config)?;

        let app = self.registry.resolve(&config.app.name)?;
        let ctx = AppContext {
            name: config.app.name.clone(),
            working_dir,
            settings: config.app.settings.clone(),
        };
        let app_router = app.router(&ctx)?;
        tracing::info!(application = %ctx.name, "Application built");

        self.lifecycle.transition(LifecycleState::Starting)?;
        let listener = net::bind(&config.listener).await?;
        let local_addr = listener.local_addr().map_err(LauncherError::Serve)?;

        let server = HttpServer::new(config, app_router, self.lifecycle.clone());
        let in_flight = server.in_flight();

        let server_stop = self.shutdown.subscribe();
        let drain_stop = self.shutdown.subscribe();
        let server_task = tokio::spawn(server.run(listener, server_stop));

        self.lifecycle.transition(LifecycleState::Ready)?;
        tracing::info!(address = %local_addr, "Service ready");
        if self.shutdown.is_triggered() {
            tracing::info!("Stop requested during startup, draining immediately");
        }

        let task = tokio::spawn(supervise(
            server_task,
            drain_stop,
            self.lifecycle.clone(),
            Duration::from_secs(config.shutdown.grace_period_secs),
            in_flight,
        ));

        Ok(RunningService {
            local_addr,
            lifecycle: self.lifecycle.clone(),
            shutdown: self.shutdown.clone(),
            task,
        })
    }
}

fn enter_working_dir(config: &LauncherConfig) -> Result<PathBuf, LauncherError> {
    if let Some(dir) = &config.process.working_dir {
        std::env::set_current_dir(dir).map_err(|source| LauncherError::WorkingDir {
            path: dir.clone(),
            source,
        })?;
        tracing::info!(path = ?dir, "Entered working directory");
    }

    std::env::current_dir().map_err(|source| LauncherError::WorkingDir {
        path: config.process.working_dir.clone().unwrap_or_default(),
        source,
    })
}

/// Wait for the server to stop or for shutdown, then drain within `grace`.
async fn supervise(
    mut server: JoinHandle<io::Result<()>>,
    mut stop: ShutdownListener,
    lifecycle: Lifecycle,
    grace: Duration,
    in_flight: InFlightTracker,
) -> Result<(), LauncherError> {
    // A server that returns after a stop request is a normal stop, so the
    // stop branch is polled first.
    tokio::select! {
        biased;
        () = stop.recv() => {}
        joined = &mut server => {
            let error = match joined {
                Ok(Ok(())) => io::Error::other("server exited without a shutdown request"),
                Ok(Err(e)) => e,
                Err(e) => io::Error::other(e),
            };
            lifecycle.fail();
            tracing::error!(error = %error, "Server crashed");
            return Err(LauncherError::Serve(error));
        }
    }

    lifecycle.transition(LifecycleState::Draining)?;
    tracing::info!(
        in_flight = in_flight.active_count(),
        grace_period_secs = grace.as_secs(),
        "Draining in-flight requests"
    );

    match tokio::time::timeout(grace, &mut server).await {
        Ok(Ok(Ok(()))) => {}
        Ok(Ok(Err(e))) => {
            lifecycle.fail();
            return Err(LauncherError::Serve(e));
        }
        Ok(Err(e)) => {
            lifecycle.fail();
            return Err(LauncherError::Serve(io::Error::other(e)));
        }
        Err(_) => {
            server.abort();
            let _ = server.await;
            tracing::warn!(
                abandoned = in_flight.active_count(),
                "Grace period elapsed, stopping without waiting for in-flight requests"
            );
        }
    }

    lifecycle.transition(LifecycleState::Stopped)?;
    tracing::info!("Shutdown complete");
    Ok(())
}

/// Handle to a service in the `Ready` state.
#[derive(Debug)]
pub struct RunningService {
    local_addr: SocketAddr,
    lifecycle: Lifecycle,
    shutdown: Shutdown,
    task: JoinHandle<Result<(), LauncherError>>,
}

impl RunningService {
    /// Address the listener is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    /// Request a graceful stop.
    pub fn stop(&self) {
        self.shutdown.trigger();
    }

    /// Wait until the service has stopped.
    pub async fn wait(self) -> Result<(), LauncherError> {
        match self.task.await {
            Ok(result) => result,
            Err(e) => {
                self.lifecycle.fail();
                Err(LauncherError::Serve(io::Error::other(e)))
            }
        }
    }
}
