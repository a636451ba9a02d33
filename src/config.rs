// src/config.rs
// =============================================================================
// Runtime settings for the audit engine and the request gate.
//
// Defaults match the public audit tool: 15s page timeout, 5s robots.txt
// timeout, at most 5 redirects, 10 audits per client per minute. The CLI
// (src/cli.rs) overrides them from flags or environment variables.
// =============================================================================

use std::time::Duration;

/// User-Agent sent with every outbound request
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (compatible; SEOAuditBot/2.0; +https://github.com/vswaroop04/seo-audit)";

/// Settings for outbound fetches
#[derive(Debug, Clone)]
pub struct AuditConfig {
    pub page_timeout: Duration,
    pub robots_timeout: Duration,
    pub max_redirects: usize,
    pub user_agent: String,
    /// Bodies larger than this are treated as a fetch failure
    pub max_body_bytes: usize,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            page_timeout: Duration::from_secs(15),
            robots_timeout: Duration::from_secs(5),
            max_redirects: 5,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_body_bytes: 5 * 1024 * 1024,
        }
    }
}

/// Settings for the per-client request gate
#[derive(Debug, Clone)]
pub struct GateConfig {
    pub max_requests: u32,
    pub window: Duration,
    /// Use X-Forwarded-For / X-Real-IP / CF-Connecting-IP as the client key.
    /// Only safe behind a proxy that overwrites these headers.
    pub trust_proxy_headers: bool,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            max_requests: 10,
            window: Duration::from_millis(60_000),
            trust_proxy_headers: false,
        }
    }
}
