//! Health probe client, used by the `probe` subcommand and container
//! `HEALTHCHECK`.

use std::time::Duration;

/// Error returned when the probe cannot reach a healthy service.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("probe request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered {status}")]
    Unhealthy { url: String, status: u16 },
}

/// GET `url` and succeed on a 2xx answer within `timeout`.
pub async fn probe(url: &str, timeout: Duration) -> Result<u16, ProbeError> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .no_proxy()
        .build()
        .map_err(|source| ProbeError::Request {
            url: url.to_string(),
            source,
        })?;

    let response = client
        .get(url)
        .header("user-agent", "service-launcher-probe")
        .send()
        .await
        .map_err(|source| ProbeError::Request {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if status.is_success() {
        Ok(status.as_u16())
    } else {
        Err(ProbeError::Unhealthy {
            url: url.to_string(),
            status: status.as_u16(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::get, Router};
    use std::net::SocketAddr;

    async fn serve_fixture() -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let router = Router::new()
            .route("/healthz", get(|| async { "alive" }))
            .route("/draining", get(|| async { StatusCode::SERVICE_UNAVAILABLE }));
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });
        addr
    }

    #[tokio::test]
    async fn success_status_is_healthy() {
        let addr = serve_fixture().await;
        let status = probe(&format!("http://{addr}/healthz"), Duration::from_secs(2))
            .await
            .unwrap();
        assert_eq!(status, 200);
    }

    #[tokio::test]
    async fn error_status_is_unhealthy() {
        let addr = serve_fixture().await;
        let err = probe(&format!("http://{addr}/draining"), Duration::from_secs(2))
            .await
            .unwrap_err();
        assert!(matches!(err, ProbeError::Unhealthy { status: 503, .. }));
    }

    #[tokio::test]
    async fn closed_port_is_a_request_error() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let err = probe(&format!("http://127.0.0.1:{port}/healthz"), Duration::from_secs(2))
            .await
            .unwrap_err();
        assert!(matches!(err, ProbeError::Request { .. }));
    }
}
