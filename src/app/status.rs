//! Minimal service description at `/`.

use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::app::{AppContext, Application, ApplicationError};

/// Serves `GET /` with the service name and version.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusApp;

#[derive(Debug, Clone, Serialize)]
pub struct ServiceInfo {
    pub service: String,
    pub version: &'static str,
    pub status: &'static str,
}

impl Application for StatusApp {
    fn name(&self) -> &str {
        "status"
    }

    fn router(&self, ctx: &AppContext) -> Result<Router, ApplicationError> {
        let info = ServiceInfo {
            service: ctx
                .setting("service_name")
                .unwrap_or(env!("CARGO_PKG_NAME"))
                .to_string(),
            version: env!("CARGO_PKG_VERSION"),
            status: "ok",
        };

        Ok(Router::new().route("/", get(move || async move { Json(info) })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn root_returns_service_info() {
        let mut ctx = AppContext::default();
        ctx.settings
            .insert("service_name".into(), "crish-api".into());
        let router = StatusApp.router(&ctx).unwrap();

        let response = router
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["service"], "crish-api");
        assert_eq!(json["status"], "ok");
    }
}
