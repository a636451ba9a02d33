// src/testing.rs
// =============================================================================
// Test doubles for the engine's collaborators. Compiled only for tests.
// =============================================================================

use std::io;
use std::net::{IpAddr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::AuditError;
use crate::fetch::{FetchedDocument, PageFetcher};
use crate::guard::{DnsResolver, NormalizedTarget};

/// Serves one canned page and counts every call
pub struct StubFetcher {
    body: Result<String, String>,
    robots: bool,
    page_calls: AtomicUsize,
    robots_calls: AtomicUsize,
    requested: Mutex<Vec<String>>,
}

impl StubFetcher {
    pub fn page(html: &str) -> Self {
        Self::with_body(Ok(html.to_string()))
    }

    pub fn failing(cause: &str) -> Self {
        Self::with_body(Err(cause.to_string()))
    }

    fn with_body(body: Result<String, String>) -> Self {
        Self {
            body,
            robots: false,
            page_calls: AtomicUsize::new(0),
            robots_calls: AtomicUsize::new(0),
            requested: Mutex::new(Vec::new()),
        }
    }

    pub fn with_robots(mut self, present: bool) -> Self {
        self.robots = present;
        self
    }

    pub fn page_calls(&self) -> usize {
        self.page_calls.load(Ordering::SeqCst)
    }

    pub fn robots_calls(&self) -> usize {
        self.robots_calls.load(Ordering::SeqCst)
    }

    pub fn requested_urls(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for StubFetcher {
    async fn fetch_page(&self, target: &NormalizedTarget) -> Result<FetchedDocument, AuditError> {
        self.page_calls.fetch_add(1, Ordering::SeqCst);
        self.requested.lock().unwrap().push(target.as_str().to_string());

        match &self.body {
            Ok(body) => Ok(FetchedDocument {
                final_url: target.as_str().to_string(),
                status: 200,
                content_type: Some("text/html".to_string()),
                body: body.clone(),
            }),
            Err(cause) => Err(AuditError::FetchFailed(cause.clone())),
        }
    }

    async fn robots_txt_present(&self, _target: &NormalizedTarget) -> bool {
        self.robots_calls.fetch_add(1, Ordering::SeqCst);
        self.robots
    }
}

/// Answers every lookup with the same addresses
pub struct FixedResolver(Vec<IpAddr>);

impl FixedResolver {
    pub fn new(ips: &[&str]) -> Self {
        Self(ips.iter().map(|ip| ip.parse().unwrap()).collect())
    }

    /// example.com's documentation address
    pub fn public() -> Self {
        Self::new(&["93.184.216.34"])
    }
}

#[async_trait]
impl DnsResolver for FixedResolver {
    async fn resolve(&self, _host: &str, port: u16) -> io::Result<Vec<SocketAddr>> {
        Ok(self.0.iter().map(|ip| SocketAddr::new(*ip, port)).collect())
    }
}
