// src/checks/links.rs
// =============================================================================
// Internal and external link counts.
//
// Classification is by the raw href, before any resolution:
// - internal: starts with "/" or contains the target's hostname
// - external: otherwise, if it starts with "http"
// - anything else (#anchors, mailto:, relative "page.html") counts as neither
//
// A rel containing "nofollow" is tallied on its own, whatever the bucket.
// Both checks are binary: zero links is a warning, never a failure.
// =============================================================================

use url::Url;

use super::{CheckResult, Evidence, Status};
use crate::markup::PageDocument;

/// Link tallies for one page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkCounts {
    pub internal: usize,
    pub external: usize,
    pub nofollow: usize,
}

/// Sorts every anchor into internal / external / neither
pub fn count_links(doc: &PageDocument, target: &Url) -> LinkCounts {
    let hostname = target.host_str().unwrap_or_default();
    let mut counts = LinkCounts::default();

    for anchor in &doc.anchors {
        let href = anchor.href.as_str();

        if href.starts_with('/') || (!hostname.is_empty() && href.contains(hostname)) {
            counts.internal += 1;
        } else if href.starts_with("http") {
            counts.external += 1;
        }

        if anchor.rel.as_deref().is_some_and(|rel| rel.contains("nofollow")) {
            counts.nofollow += 1;
        }
    }

    counts
}

pub fn check_internal_links(doc: &PageDocument, target: &Url) -> CheckResult {
    let count = count_links(doc, target).internal;

    let (status, message) = if count > 0 {
        (Status::Pass, format!("{} internal links found", count))
    } else {
        (Status::Warning, "No internal links found".to_string())
    };

    CheckResult::new(status, message, Evidence::InternalLinks { count, broken: 0 })
}

pub fn check_external_links(doc: &PageDocument, target: &Url) -> CheckResult {
    let counts = count_links(doc, target);
    let count = counts.external;

    let (status, message) = if count > 0 {
        (Status::Pass, format!("{} external links found", count))
    } else {
        (Status::Warning, "No external links found".to_string())
    };

    CheckResult::new(
        status,
        message,
        Evidence::ExternalLinks {
            count,
            nofollow: counts.nofollow,
        },
    )
}
