// src/gate.rs
// =============================================================================
// The request gate: a per-client rate limit consulted once per audit,
// before validation or any fetch.
//
// The limiter is a trait so the server can take whatever backend it is
// given (a shared store in a multi-instance deployment, the in-memory one
// below otherwise). It is passed in through server state, never a global.
//
// The in-memory limiter keeps a sliding window of request instants per key:
// drop instants older than the window, then allow if fewer than
// `max_requests` remain.
// =============================================================================

use std::collections::{HashMap, VecDeque};
use std::net::IpAddr;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use axum::http::HeaderMap;

/// Key used when no client address can be determined
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Stale keys are swept once the map grows past this many entries
const SWEEP_THRESHOLD: usize = 10_000;

/// Decides whether a caller may run another audit
pub trait RateLimiter: Send + Sync {
    /// Records the attempt and returns false once `key` has used up
    /// `max_requests` within `window`
    fn check_rate_limit(&self, key: &str, max_requests: u32, window: Duration) -> bool;
}

/// Sliding-window limiter kept in process memory
#[derive(Debug, Default)]
pub struct InMemoryRateLimiter {
    hits: Mutex<HashMap<String, VecDeque<Instant>>>,
}

impl InMemoryRateLimiter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RateLimiter for InMemoryRateLimiter {
    fn check_rate_limit(&self, key: &str, max_requests: u32, window: Duration) -> bool {
        let now = Instant::now();
        // A poisoned lock still holds consistent timestamps
        let mut hits = self.hits.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        if hits.len() > SWEEP_THRESHOLD {
            hits.retain(|_, times| times.back().is_some_and(|t| now.duration_since(*t) < window));
        }

        let times = hits.entry(key.to_string()).or_default();
        while times.front().is_some_and(|t| now.duration_since(*t) >= window) {
            times.pop_front();
        }

        if times.len() < max_requests as usize {
            times.push_back(now);
            true
        } else {
            false
        }
    }
}

/// Picks the rate-limit key for a request
///
/// With `trust_proxy_headers`, the first X-Forwarded-For entry wins, then
/// X-Real-IP, then CF-Connecting-IP. Otherwise (or if none is set) the
/// socket peer address is used.
pub fn client_key(headers: &HeaderMap, peer: Option<IpAddr>, trust_proxy_headers: bool) -> String {
    if trust_proxy_headers {
        let forwarded = header_str(headers, "x-forwarded-for")
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty());

        let from_proxy = forwarded
            .or_else(|| header_str(headers, "x-real-ip").map(str::trim))
            .or_else(|| header_str(headers, "cf-connecting-ip").map(str::trim))
            .filter(|v| !v.is_empty());

        if let Some(ip) = from_proxy {
            return ip.to_string();
        }
    }

    peer.map(|ip| ip.to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}
