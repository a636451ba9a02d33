// src/fetch/http.rs
// =============================================================================
// Fetches the audited page and probes robots.txt with reqwest.
//
// Page request:
// - 15s timeout, at most 5 redirects, a declared User-Agent and browser-like
//   Accept / Accept-Language headers
// - any status below 500 is analyzed (a 404 page still gets audited)
// - 5xx, timeouts, DNS/connection errors and oversized bodies are failures
//
// robots.txt request:
// - 5s timeout, same headers
// - only answers "did it return 200?"; every error means "no"
//
// Both requests connect to the addresses the guard already checked. A
// redirect hop is refused if its host fails the literal rules, and any other
// hostname it names is resolved through `GuardedResolver` (src/fetch/dns.rs).
//
// Bodies are decoded with the charset from Content-Type, UTF-8 otherwise.
// =============================================================================

use async_trait::async_trait;
use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, UPGRADE_INSECURE_REQUESTS,
};
use reqwest::redirect::Policy;
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::dns::GuardedResolver;
use crate::config::AuditConfig;
use crate::error::AuditError;
use crate::guard::{is_blocked_host, DnsResolver, NormalizedTarget};

/// The target page as it came off the wire
///
/// Created by the fetcher, read once by the markup parser, then dropped.
#[derive(Debug, Clone)]
pub struct FetchedDocument {
    /// URL after following redirects
    pub final_url: String,
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

/// Outbound calls made during one audit
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// GET the target page. Errors are always `AuditError::FetchFailed`.
    async fn fetch_page(&self, target: &NormalizedTarget) -> Result<FetchedDocument, AuditError>;

    /// GET `{origin}/robots.txt`; true only for HTTP 200. Never fails.
    async fn robots_txt_present(&self, target: &NormalizedTarget) -> bool;
}

/// reqwest-backed fetcher used by the server and the CLI
pub struct HttpFetcher {
    config: AuditConfig,
    dns: Arc<GuardedResolver>,
}

impl HttpFetcher {
    /// `resolver` answers for redirect hosts; the audited host is pinned
    pub fn new(config: AuditConfig, resolver: Arc<dyn DnsResolver>) -> Self {
        Self {
            config,
            dns: Arc::new(GuardedResolver::new(resolver)),
        }
    }

    // A client per request, because the pinned addresses differ per target
    fn client_for(&self, target: &NormalizedTarget, timeout: Duration) -> reqwest::Result<Client> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
        headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));

        let mut builder = Client::builder()
            .timeout(timeout)
            .user_agent(self.config.user_agent.as_str())
            .default_headers(headers)
            .redirect(guarded_redirects(self.config.max_redirects))
            .dns_resolver(self.dns.clone())
            // A proxy would resolve hostnames itself, past both checks
            .no_proxy();

        if let Some(domain) = target.url.domain() {
            if !target.resolved.is_empty() {
                builder = builder.resolve_to_addrs(domain, &target.resolved);
            }
        }

        builder.build()
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch_page(&self, target: &NormalizedTarget) -> Result<FetchedDocument, AuditError> {
        let client = self
            .client_for(target, self.config.page_timeout)
            .map_err(|e| AuditError::FetchFailed(format!("could not build HTTP client: {}", e)))?;

        let mut response = client
            .get(target.url.clone())
            .send()
            .await
            .map_err(|e| AuditError::FetchFailed(describe_error(&e)))?;

        let status = response.status();
        if status.as_u16() >= 500 {
            return Err(AuditError::FetchFailed(format!("HTTP {}", status.as_u16())));
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let limit = self.config.max_body_bytes;
        if response.content_length().is_some_and(|len| len as usize > limit) {
            return Err(AuditError::FetchFailed(format!("response larger than {} bytes", limit)));
        }

        // Read in chunks so a lying or missing Content-Length can't blow the limit
        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| AuditError::FetchFailed(describe_error(&e)))?
        {
            body.extend_from_slice(&chunk);
            if body.len() > limit {
                return Err(AuditError::FetchFailed(format!("response larger than {} bytes", limit)));
            }
        }

        let charset = content_type.as_deref().and_then(extract_charset);
        let body = decode_body(&body, charset.as_deref());

        Ok(FetchedDocument {
            final_url,
            status: status.as_u16(),
            content_type,
            body,
        })
    }

    async fn robots_txt_present(&self, target: &NormalizedTarget) -> bool {
        let Some(robots_url) = target.robots_url() else {
            return false;
        };

        let client = match self.client_for(target, self.config.robots_timeout) {
            Ok(client) => client,
            Err(e) => {
                debug!(error = %e, "could not build robots.txt client");
                return false;
            }
        };

        match client.get(robots_url.clone()).send().await {
            Ok(response) => response.status() == StatusCode::OK,
            Err(e) => {
                debug!(url = %robots_url, error = %describe_error(&e), "robots.txt fetch failed");
                false
            }
        }
    }
}

// Follows up to `max` redirects, refusing any hop to an internal host.
// `previous()` includes the original request, hence `>`.
fn guarded_redirects(max: usize) -> Policy {
    Policy::custom(move |attempt| {
        if attempt.previous().len() > max {
            attempt.error("too many redirects")
        } else if !matches!(attempt.url().scheme(), "http" | "https") {
            attempt.error("redirect to a non-HTTP scheme")
        } else if is_blocked_host(attempt.url()) {
            attempt.error("redirect to an internal host")
        } else {
            attempt.follow()
        }
    })
}

// "text/html; charset=ISO-8859-1" -> Some("iso-8859-1")
fn extract_charset(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|param| {
        let lower = param.trim().to_ascii_lowercase();
        let value = lower.strip_prefix("charset=")?.trim().trim_matches('"');
        (!value.is_empty()).then(|| value.to_string())
    })
}

// Unknown labels fall back to UTF-8; undecodable bytes become U+FFFD
fn decode_body(bytes: &[u8], charset: Option<&str>) -> String {
    let label = charset.unwrap_or("utf-8");
    let encoding = encoding_rs::Encoding::for_label(label.as_bytes()).unwrap_or(encoding_rs::UTF_8);
    if encoding == encoding_rs::UTF_8 {
        return String::from_utf8_lossy(bytes).into_owned();
    }

    let (decoded, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        warn!(charset = label, "page body had bytes invalid for its charset");
    }
    decoded.into_owned()
}

// Turns a reqwest error into a short cause for the server log
//
// reqwest errors can happen for many reasons:
// - Network timeout
// - DNS resolution failure
// - Connection refused
// - Redirect limit or a refused redirect hop
fn describe_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        "Request timed out".to_string()
    } else if error.is_redirect() {
        format!("Redirect refused: {}", error)
    } else if error.is_connect() {
        format!("Connection failed: {}", error)
    } else {
        error.to_string()
    }
}
