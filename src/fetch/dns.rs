// src/fetch/dns.rs
// =============================================================================
// The resolver reqwest uses for every hostname it has not been pinned to.
//
// The audited host itself is pinned with `resolve_to_addrs`, so this only
// sees hosts reached through redirects. Each answer goes through the same
// range check as the initial target; a single blocked address fails the
// lookup, and reqwest reports it as a connect error.
// =============================================================================

use std::error::Error as StdError;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use reqwest::dns::{Addrs, Name, Resolve, Resolving};
use tracing::warn;

use crate::guard::{is_blocked_ip, DnsResolver};

type BoxError = Box<dyn StdError + Send + Sync>;

pub(crate) struct GuardedResolver {
    inner: Arc<dyn DnsResolver>,
}

impl GuardedResolver {
    pub(crate) fn new(inner: Arc<dyn DnsResolver>) -> Self {
        Self { inner }
    }
}

impl Resolve for GuardedResolver {
    fn resolve(&self, name: Name) -> Resolving {
        let inner = self.inner.clone();
        let host = name.as_str().to_string();

        Box::pin(async move {
            match checked_lookup(inner.as_ref(), &host).await {
                Ok(addrs) => Ok(Box::new(addrs.into_iter()) as Addrs),
                Err(e) => Err(Box::new(e) as BoxError),
            }
        })
    }
}

// Port 0: the connector fills in the port from the URL
async fn checked_lookup(resolver: &dyn DnsResolver, host: &str) -> io::Result<Vec<SocketAddr>> {
    let addrs = resolver.resolve(host, 0).await?;

    if let Some(blocked) = addrs.iter().find(|addr| is_blocked_ip(addr.ip())) {
        warn!(host = %host, ip = %blocked.ip(), "redirect target resolves to a blocked address");
        return Err(io::Error::new(
            io::ErrorKind::PermissionDenied,
            format!("{} resolves to a blocked address", host),
        ));
    }

    Ok(addrs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FixedResolver;

    #[tokio::test]
    async fn test_public_answer_passes_through() {
        let resolver = FixedResolver::public();
        let addrs = checked_lookup(&resolver, "cdn.example.com").await.unwrap();
        assert_eq!(addrs.len(), 1);
        assert_eq!(addrs[0].ip().to_string(), "93.184.216.34");
    }

    #[tokio::test]
    async fn test_any_blocked_answer_fails_lookup() {
        let resolver = FixedResolver::new(&["93.184.216.34", "169.254.169.254"]);
        let err = checked_lookup(&resolver, "metadata.example.com").await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
    }

    #[tokio::test]
    async fn test_resolve_trait_reports_blocked_host() {
        let guarded = GuardedResolver::new(Arc::new(FixedResolver::new(&["127.0.0.1"])));
        let name: Name = "admin.example.com".parse().unwrap();
        assert!(guarded.resolve(name).await.is_err());
    }
}
