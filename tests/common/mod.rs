//! Shared utilities for launcher integration tests.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use axum::{routing::get, Router};
use service_launcher::{AppContext, Application, ApplicationError, LauncherConfig};

/// A loopback port that was free a moment ago.
pub fn free_port() -> u16 {
    let probe = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    probe.local_addr().unwrap().port()
}

/// Loopback configuration on a free port with a short grace period.
pub fn loopback_config() -> LauncherConfig {
    let mut config = LauncherConfig::default();
    config.listener.host = IpAddr::V4(Ipv4Addr::LOCALHOST);
    config.listener.port = free_port();
    config.shutdown.grace_period_secs = 2;
    config
}

/// HTTP client that never pools or proxies.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .timeout(Duration::from_secs(10))
        .build()
        .unwrap()
}

pub fn url(addr: SocketAddr, path: &str) -> String {
    format!("http://{addr}{path}")
}

/// Application whose only route answers after `delay`.
pub struct SlowApp(pub Duration);

impl Application for SlowApp {
    fn name(&self) -> &str {
        "slow"
    }

    fn router(&self, _ctx: &AppContext) -> Result<Router, ApplicationError> {
        let delay = self.0;
        Ok(Router::new().route(
            "/slow",
            get(move || async move {
                tokio::time::sleep(delay).await;
                "done"
            }),
        ))
    }
}
