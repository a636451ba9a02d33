// src/server.rs
// =============================================================================
// HTTP boundary for the audit engine.
//
// Route map:
//   POST /seo-audit   body {"url": "..."} -> AuditReport
//   GET  /health      liveness probe
//
// Order inside POST /seo-audit is fixed: rate limit, then body, then the
// engine (validation, fetch, checks). A denied caller never gets as far as
// URL parsing.
//
// Error bodies:
//   429 / 400  {"error": "..."}
//   500        {"error": "Failed to perform SEO audit", "details": "..."}
// =============================================================================

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::connect_info::IntoMakeServiceWithConnectInfo;
use axum::extract::rejection::JsonRejection;
use axum::extract::{ConnectInfo, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use crate::config::GateConfig;
use crate::engine::AuditEngine;
use crate::error::AuditError;
use crate::gate::{client_key, RateLimiter};
use crate::report::AuditReport;

/// Shared, read-only server state
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<AuditEngine>,
    pub limiter: Arc<dyn RateLimiter>,
    pub gate: Arc<GateConfig>,
}

/// Body of POST /seo-audit
#[derive(Debug, Deserialize)]
pub struct AuditRequest {
    #[serde(default)]
    pub url: Option<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/seo-audit", post(audit_handler))
        .with_state(state)
}

/// The router as a service that records each connection's peer address
pub fn make_service(state: AppState) -> IntoMakeServiceWithConnectInfo<Router, SocketAddr> {
    router(state).into_make_service_with_connect_info::<SocketAddr>()
}

/// Binds `addr` and serves until the process is stopped
pub async fn serve(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "SEO audit server listening");
    axum::serve(listener, make_service(state)).await?;
    Ok(())
}

async fn health_handler() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn audit_handler(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    body: Result<Json<AuditRequest>, JsonRejection>,
) -> Result<Json<AuditReport>, AuditError> {
    let key = client_key(&headers, Some(peer.ip()), state.gate.trust_proxy_headers);
    if !state
        .limiter
        .check_rate_limit(&key, state.gate.max_requests, state.gate.window)
    {
        warn!(client = %key, "rate limit exceeded");
        return Err(AuditError::RateLimited);
    }

    let Json(request) = body.map_err(|rejection| {
        warn!(client = %key, reason = %rejection.body_text(), "unreadable audit request");
        AuditError::InvalidBody
    })?;
    let url = request.url.ok_or(AuditError::MissingUrl)?;

    let report = state.engine.audit(&url).await?;
    Ok(Json(report))
}

impl IntoResponse for AuditError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            AuditError::FetchFailed(_) => json!({
                "error": "Failed to perform SEO audit",
                "details": self.to_string(),
            }),
            _ => json!({ "error": self.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::InMemoryRateLimiter;
    use crate::testing::{FixedResolver, StubFetcher};
    use reqwest::StatusCode;
    use serde_json::Value;
    use std::time::Duration;

    const NO_TITLE: &str = r#"<html><body><h1>Hello</h1><a href="/a">a</a></body></html>"#;

    async fn spawn_app(fetcher: Arc<StubFetcher>, gate: GateConfig) -> String {
        let state = AppState {
            engine: Arc::new(AuditEngine::new(fetcher, Arc::new(FixedResolver::public()))),
            limiter: Arc::new(InMemoryRateLimiter::new()),
            gate: Arc::new(gate),
        };

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, make_service(state)).await.unwrap();
        });

        format!("http://{}", addr)
    }

    async fn post_audit(base: &str, body: Value) -> (StatusCode, Value) {
        let response = reqwest::Client::new()
            .post(format!("{}/seo-audit", base))
            .json(&body)
            .send()
            .await
            .unwrap();
        let status = response.status();
        (status, response.json().await.unwrap())
    }

    #[tokio::test]
    async fn test_audit_returns_report() {
        let fetcher = Arc::new(StubFetcher::page(NO_TITLE));
        let base = spawn_app(fetcher.clone(), GateConfig::default()).await;

        let (status, body) = post_audit(&base, json!({ "url": "example.com" })).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["url"], "https://example.com/");
        assert_eq!(body["checks"]["title"]["status"], "fail");
        assert!(body["recommendations"]
            .as_array()
            .unwrap()
            .contains(&json!("Add a compelling title tag between 30-60 characters")));

        let issues = &body["issues"];
        let total = issues["critical"].as_u64().unwrap()
            + issues["warning"].as_u64().unwrap()
            + issues["passed"].as_u64().unwrap();
        assert_eq!(total, 12);
    }

    #[tokio::test]
    async fn test_internal_url_rejected_without_fetch() {
        let fetcher = Arc::new(StubFetcher::page(NO_TITLE));
        let base = spawn_app(fetcher.clone(), GateConfig::default()).await;

        let (status, body) = post_audit(&base, json!({ "url": "http://192.168.1.5" })).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("Internal URLs"));
        assert_eq!(fetcher.page_calls(), 0);
        assert_eq!(fetcher.robots_calls(), 0);
    }

    #[tokio::test]
    async fn test_eleventh_call_is_rate_limited() {
        let fetcher = Arc::new(StubFetcher::page(NO_TITLE));
        let base = spawn_app(fetcher.clone(), GateConfig::default()).await;

        for _ in 0..10 {
            let (status, _) = post_audit(&base, json!({ "url": "example.com" })).await;
            assert_eq!(status, StatusCode::OK);
        }

        let (status, body) = post_audit(&base, json!({ "url": "example.com" })).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body["error"], "Rate limit exceeded. Please try again later.");
        assert_eq!(fetcher.page_calls(), 10);
    }

    #[tokio::test]
    async fn test_gate_runs_before_validation() {
        let fetcher = Arc::new(StubFetcher::page(NO_TITLE));
        let gate = GateConfig {
            max_requests: 1,
            window: Duration::from_secs(60),
            trust_proxy_headers: false,
        };
        let base = spawn_app(fetcher.clone(), gate).await;

        let (status, _) = post_audit(&base, json!({ "url": "ftp://example.com" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        // The rejected request still used the budget
        let (status, _) = post_audit(&base, json!({ "url": "example.com" })).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(fetcher.page_calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_url() {
        let fetcher = Arc::new(StubFetcher::page(NO_TITLE));
        let base = spawn_app(fetcher, GateConfig::default()).await;

        let (status, body) = post_audit(&base, json!({})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "URL is required");

        let (status, body) = post_audit(&base, json!({ "url": "" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "URL is required");
    }

    #[tokio::test]
    async fn test_unreadable_body() {
        let fetcher = Arc::new(StubFetcher::page(NO_TITLE));
        let base = spawn_app(fetcher, GateConfig::default()).await;

        let response = reqwest::Client::new()
            .post(format!("{}/seo-audit", base))
            .header("content-type", "application/json")
            .body("{not json")
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["error"], "Invalid request body");
    }

    #[tokio::test]
    async fn test_fetch_failure_is_500_with_details() {
        let fetcher = Arc::new(StubFetcher::failing("dns error: no such host"));
        let base = spawn_app(fetcher, GateConfig::default()).await;

        let (status, body) = post_audit(&base, json!({ "url": "https://example.com" })).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to perform SEO audit");
        assert_eq!(body["details"], "Failed to analyze website");
    }

    #[tokio::test]
    async fn test_health() {
        let fetcher = Arc::new(StubFetcher::page(NO_TITLE));
        let base = spawn_app(fetcher, GateConfig::default()).await;

        let response = reqwest::get(format!("{}/health", base)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["status"], "ok");
    }
}
