// src/engine.rs
// =============================================================================
// The audit pipeline, start to finish:
//
//   raw input -> validate_url -> resolve_target -> (page, robots.txt)
//             -> parse_document -> run_all -> build_report
//
// The engine owns no per-request state. Its two collaborators (how to fetch,
// how to resolve) are injected, which is what lets the tests prove that a
// rejected URL never reaches the network.
// =============================================================================

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::checks;
use crate::config::AuditConfig;
use crate::error::AuditError;
use crate::fetch::{HttpFetcher, PageFetcher};
use crate::guard::{self, DnsResolver, TokioDnsResolver};
use crate::markup;
use crate::report::{self, AuditReport};

pub struct AuditEngine {
    fetcher: Arc<dyn PageFetcher>,
    resolver: Arc<dyn DnsResolver>,
}

impl AuditEngine {
    pub fn new(fetcher: Arc<dyn PageFetcher>, resolver: Arc<dyn DnsResolver>) -> Self {
        Self { fetcher, resolver }
    }

    /// Engine wired to reqwest and the system DNS resolver
    pub fn with_http(config: AuditConfig) -> Self {
        let resolver: Arc<dyn DnsResolver> = Arc::new(TokioDnsResolver);
        Self::new(Arc::new(HttpFetcher::new(config, resolver.clone())), resolver)
    }

    /// Runs one audit against user-supplied input
    pub async fn audit(&self, raw_url: &str) -> Result<AuditReport, AuditError> {
        let url = guard::validate_url(raw_url).inspect_err(|e| {
            warn!(input = %raw_url, reason = %e, "audit target rejected");
        })?;

        let target = guard::resolve_target(url, self.resolver.as_ref())
            .await
            .inspect_err(|e| log_failure(raw_url, e))?;

        info!(url = %target.as_str(), "starting SEO audit");

        // robots.txt failures are absorbed inside the fetcher, so only the
        // page result can stop the audit
        let (page, has_robots) = tokio::join!(
            self.fetcher.fetch_page(&target),
            self.fetcher.robots_txt_present(&target)
        );
        let page = page.inspect_err(|e| log_failure(target.as_str(), e))?;

        let document = markup::parse_document(&page.body);
        let checks = checks::run_all(&document, &target.url, has_robots);
        let report = report::build_report(target.as_str(), checks);

        info!(
            url = %report.url,
            final_url = %page.final_url,
            content_type = page.content_type.as_deref().unwrap_or("-"),
            http_status = page.status,
            score = report.overall_score,
            critical = report.issues.critical,
            warnings = report.issues.warning,
            "SEO audit complete"
        );

        Ok(report)
    }
}

fn log_failure(url: &str, err: &AuditError) {
    match err {
        AuditError::FetchFailed(cause) => error!(url = %url, cause = %cause, "audit fetch failed"),
        other => warn!(url = %url, reason = %other, "audit target rejected"),
    }
}
