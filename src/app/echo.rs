//! Echo application: reflects the request back as JSON.
//! Useful for checking what reaches the process through the container's
//! port mapping and any proxies in front of it.

use std::collections::BTreeMap;

use axum::{
    http::{HeaderMap, Method, Uri},
    routing::any,
    Json, Router,
};
use serde::Serialize;

use crate::app::{AppContext, Application, ApplicationError};

#[derive(Debug, Clone, Copy, Default)]
pub struct EchoApp;

#[derive(Debug, Serialize)]
struct Echo {
    method: String,
    path: String,
    query: Option<String>,
    headers: BTreeMap<String, String>,
}

async fn echo(method: Method, uri: Uri, headers: HeaderMap) -> Json<Echo> {
    let headers = headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();

    Json(Echo {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        headers,
    })
}

impl Application for EchoApp {
    fn name(&self) -> &str {
        "echo"
    }

    fn router(&self, _ctx: &AppContext) -> Result<Router, ApplicationError> {
        Ok(Router::new()
            .route("/", any(echo))
            .route("/{*path}", any(echo)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    #[tokio::test]
    async fn echoes_method_path_and_headers() {
        let router = EchoApp.router(&AppContext::default()).unwrap();
        let request = Request::post("/weather?forecast_date=2024-06-01")
            .header("x-trace", "abc")
            .body(Body::empty())
            .unwrap();

        let response = router.oneshot(request).await.unwrap();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["method"], "POST");
        assert_eq!(json["path"], "/weather");
        assert_eq!(json["query"], "forecast_date=2024-06-01");
        assert_eq!(json["headers"]["x-trace"], "abc");
    }
}
