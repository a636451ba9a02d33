// src/guard/resolve.rs
// =============================================================================
// DNS resolution and IP range checks.
//
// A hostname can look public and still resolve to 10.0.0.5 or 127.0.0.1.
// So after the literal rules pass we resolve the host, refuse the target if
// ANY address lands in a blocked range, and hand the checked addresses to
// the fetcher so the connection goes to exactly those (no second lookup that
// a rebinding DNS server could answer differently).
//
// Blocked ranges:
// - IPv4: unspecified, "this network" 0/8, loopback 127/8, RFC 1918
//   private, RFC 3927 link-local 169.254/16, CGNAT 100.64/10, broadcast,
//   multicast
// - IPv6: unspecified, loopback, unique-local fc00::/7, link-local
//   fe80::/10, multicast, and IPv4-mapped forms of the v4 ranges
// =============================================================================

use std::io;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

use async_trait::async_trait;
use tracing::warn;
use url::{Host, Url};

use super::NormalizedTarget;
use crate::error::AuditError;

/// Resolves a hostname to socket addresses
///
/// The server uses `TokioDnsResolver`; tests inject fixed answers.
#[async_trait]
pub trait DnsResolver: Send + Sync {
    async fn resolve(&self, host: &str, port: u16) -> io::Result<Vec<SocketAddr>>;
}

/// System resolver via `tokio::net::lookup_host`
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioDnsResolver;

#[async_trait]
impl DnsResolver for TokioDnsResolver {
    async fn resolve(&self, host: &str, port: u16) -> io::Result<Vec<SocketAddr>> {
        let addrs = tokio::net::lookup_host((host, port)).await?;
        Ok(addrs.collect())
    }
}

/// Resolves the URL's host and checks every address
///
/// Returns:
///   Ok(target) with the pinned addresses
///   Err(InternalUrlBlocked) if any address is in a blocked range
///   Err(FetchFailed) if resolution fails or returns nothing
pub async fn resolve_target(
    url: Url,
    resolver: &dyn DnsResolver,
) -> Result<NormalizedTarget, AuditError> {
    let host = match url.host() {
        Some(Host::Domain(domain)) => domain.to_string(),
        // IP literals were range-checked by validate_url; nothing to resolve
        Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)) => {
            return Ok(NormalizedTarget {
                url,
                resolved: Vec::new(),
            })
        }
        None => return Err(AuditError::InvalidUrl),
    };
    let port = url.port_or_known_default().unwrap_or(443);

    let addrs = resolver
        .resolve(&host, port)
        .await
        .map_err(|e| AuditError::FetchFailed(format!("DNS resolution failed for {}: {}", host, e)))?;

    if addrs.is_empty() {
        return Err(AuditError::FetchFailed(format!(
            "DNS resolution returned no addresses for {}",
            host
        )));
    }

    if let Some(blocked) = addrs.iter().find(|addr| is_blocked_ip(addr.ip())) {
        warn!(host = %host, ip = %blocked.ip(), "host resolves to a blocked address");
        return Err(AuditError::InternalUrlBlocked);
    }

    Ok(NormalizedTarget {
        url,
        resolved: addrs,
    })
}

/// True for loopback, private, link-local and other non-public addresses
pub fn is_blocked_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => is_blocked_v4(v4),
        IpAddr::V6(v6) => is_blocked_v6(v6),
    }
}

fn is_blocked_v4(ip: Ipv4Addr) -> bool {
    let [first, second, ..] = ip.octets();

    ip.is_unspecified()
        || ip.is_loopback()
        || ip.is_private()
        || ip.is_link_local()
        || ip.is_broadcast()
        || ip.is_multicast()
        || first == 0
        // 100.64.0.0/10, carrier-grade NAT
        || (first == 100 && (second & 0xc0) == 64)
}

fn is_blocked_v6(ip: Ipv6Addr) -> bool {
    if let Some(v4) = ip.to_ipv4_mapped() {
        return is_blocked_v4(v4);
    }

    let first_segment = ip.segments()[0];

    ip.is_unspecified()
        || ip.is_loopback()
        || ip.is_multicast()
        // fc00::/7, unique local
        || (first_segment & 0xfe00) == 0xfc00
        // fe80::/10, link local
        || (first_segment & 0xffc0) == 0xfe80
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FixedResolver;

    struct FailingResolver;

    #[async_trait]
    impl DnsResolver for FailingResolver {
        async fn resolve(&self, _host: &str, _port: u16) -> io::Result<Vec<SocketAddr>> {
            Err(io::Error::new(io::ErrorKind::NotFound, "no such host"))
        }
    }

    fn ip(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    #[test]
    fn test_blocked_ranges() {
        for addr in [
            "127.0.0.1",
            "10.1.2.3",
            "172.16.0.1",
            "172.31.255.255",
            "192.168.0.10",
            "169.254.169.254",
            "100.64.0.1",
            "0.0.0.0",
            "255.255.255.255",
            "::1",
            "::",
            "fc00::1",
            "fd12:3456::1",
            "fe80::1",
            "::ffff:192.168.1.1",
        ] {
            assert!(is_blocked_ip(ip(addr)), "{addr} should be blocked");
        }
    }

    #[test]
    fn test_public_addresses_allowed() {
        for addr in [
            "93.184.216.34",
            "172.67.1.1",
            "8.8.8.8",
            "100.128.0.1",
            "2606:4700::1111",
            "::ffff:93.184.216.34",
        ] {
            assert!(!is_blocked_ip(ip(addr)), "{addr} should be allowed");
        }
    }

    #[tokio::test]
    async fn test_resolve_target_pins_public_addresses() {
        let url = Url::parse("https://example.com/").unwrap();
        let resolver = FixedResolver::public();

        let target = resolve_target(url, &resolver).await.unwrap();
        assert_eq!(target.resolved, vec!["93.184.216.34:443".parse::<SocketAddr>().unwrap()]);
    }

    #[tokio::test]
    async fn test_resolve_target_rejects_private_answer() {
        let url = Url::parse("https://rebind.example.com/").unwrap();
        let resolver = FixedResolver::new(&["93.184.216.34", "10.0.0.5"]);

        let result = resolve_target(url, &resolver).await;
        assert!(matches!(result, Err(AuditError::InternalUrlBlocked)));
    }

    #[tokio::test]
    async fn test_resolution_failure_is_fetch_failure() {
        let url = Url::parse("https://does-not-exist.example/").unwrap();

        let result = resolve_target(url, &FailingResolver).await;
        assert!(matches!(result, Err(AuditError::FetchFailed(_))));
    }

    #[tokio::test]
    async fn test_ip_literal_skips_resolution() {
        let url = Url::parse("http://93.184.216.34/").unwrap();

        let target = resolve_target(url, &FailingResolver).await.unwrap();
        assert!(target.resolved.is_empty());
    }
}
