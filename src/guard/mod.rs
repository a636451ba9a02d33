// src/guard/mod.rs
// =============================================================================
// The SSRF guard: everything between a user-typed URL and the first outbound
// connection.
//
// Submodules:
// - input: turns free text into a normalized http(s) URL and applies the
//   literal host rules (localhost, private prefixes, "internal"/"local")
// - resolve: resolves the host and rejects loopback/private/link-local
//   addresses, then pins the connection to the addresses it checked
//
// Nothing in here talks HTTP. The only network call is DNS resolution.
// =============================================================================

mod input;
mod resolve;

pub use self::input::{is_blocked_host, validate_url};
pub use self::resolve::{is_blocked_ip, resolve_target, DnsResolver, TokioDnsResolver};

use std::net::SocketAddr;

use url::Url;

/// A URL that passed every guard check and is safe to fetch
#[derive(Debug, Clone)]
pub struct NormalizedTarget {
    pub url: Url,
    /// Addresses the host resolved to at validation time. Empty when the
    /// host is an IP literal.
    pub resolved: Vec<SocketAddr>,
}

impl NormalizedTarget {
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// `{origin}/robots.txt`
    pub fn robots_url(&self) -> Option<Url> {
        self.url.join("/robots.txt").ok()
    }
}
