// src/guard/input.rs
// =============================================================================
// Validates and normalizes the URL a visitor typed into the audit form.
//
// Steps:
// 1. Trim; empty input is "URL is required"
// 2. Prefix https:// when the input has no scheme ("example.com")
// 3. Parse with the `url` crate, which also normalizes (lowercase host,
//    trailing slash on an empty path, decimal/hex IPv4 forms)
// 4. Only http and https survive
// 5. Literal host rules, then IP-literal range checks
//
// The literal rules are deliberately broad: any host containing "local" or
// "internal" is refused, and so is every "172." address, public or not.
// =============================================================================

use std::net::IpAddr;

use url::{Host, Url};

use super::resolve::is_blocked_ip;
use crate::error::AuditError;

/// Turns user input into a normalized, guard-checked URL
///
/// Example:
///   "example.com"         -> Ok("https://example.com/")
///   "ftp://example.com"   -> Err(DisallowedScheme)
///   "http://192.168.1.5"  -> Err(InternalUrlBlocked)
pub fn validate_url(input: &str) -> Result<Url, AuditError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AuditError::MissingUrl);
    }

    let candidate = if has_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let url = Url::parse(&candidate).map_err(|_| AuditError::InvalidUrl)?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(AuditError::DisallowedScheme);
    }

    if url.host().is_none() {
        return Err(AuditError::InvalidUrl);
    }

    if is_blocked_host(&url) {
        return Err(AuditError::InternalUrlBlocked);
    }

    Ok(url)
}

/// True when the URL's host fails the literal host rules or is an IP
/// literal inside a blocked range. URLs without a host count as blocked.
pub fn is_blocked_host(url: &Url) -> bool {
    let Some(host_str) = url.host_str() else {
        return true;
    };
    if is_internal_hostname(host_str) {
        return true;
    }

    match url.host() {
        Some(Host::Ipv4(v4)) => is_blocked_ip(IpAddr::V4(v4)),
        Some(Host::Ipv6(v6)) => is_blocked_ip(IpAddr::V6(v6)),
        Some(Host::Domain(_)) => false,
        None => true,
    }
}

/// The literal host rules: exact names, private prefixes and the
/// "internal"/"local" substrings
pub fn is_internal_hostname(host: &str) -> bool {
    let host = host.to_ascii_lowercase();

    host == "localhost"
        || host == "127.0.0.1"
        || host.starts_with("192.168.")
        || host.starts_with("10.")
        || host.starts_with("172.")
        || host.contains("internal")
        || host.contains("local")
}

// Does the input start with "<scheme>:"?
//
// "example.com:8080/path" looks like scheme "example.com", so a digit right
// after the colon is read as a port instead.
fn has_scheme(input: &str) -> bool {
    let Some((scheme, rest)) = input.split_once(':') else {
        return false;
    };

    let mut chars = scheme.chars();
    let starts_alpha = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
    let valid_tail = chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    let port_follows = rest.starts_with(|c: char| c.is_ascii_digit());

    starts_alpha && valid_tail && !port_follows
}
