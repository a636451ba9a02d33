// src/checks/meta.rs
// =============================================================================
// Technical and metadata checks: mobile viewport, HTTPS, structured data,
// robots.txt, sitemap reference, Open Graph tags.
// =============================================================================

use url::Url;

use super::{CheckResult, Evidence, Status};
use crate::markup::PageDocument;

/// pass when the viewport meta contains width=device-width, else fail
pub fn check_mobile(doc: &PageDocument) -> CheckResult {
    let viewport = doc.viewport.clone().unwrap_or_default();

    let (status, message) = if viewport.contains("width=device-width") {
        (Status::Pass, "Mobile viewport configured correctly")
    } else {
        (Status::Fail, "No mobile viewport found")
    };

    CheckResult::new(status, message, Evidence::Viewport { viewport })
}

/// pass when the audited URL is https, else fail
///
/// Only the scheme is inspected; certificate problems already surface as
/// fetch failures.
pub fn check_ssl(target: &Url) -> CheckResult {
    let valid = target.as_str().starts_with("https://");

    let (status, message) = if valid {
        (Status::Pass, "HTTPS enabled")
    } else {
        (Status::Fail, "HTTPS not detected")
    };

    CheckResult::new(status, message, Evidence::Ssl { valid })
}

/// pass on any JSON-LD block or itemscope element, else warning
pub fn check_schema(doc: &PageDocument) -> CheckResult {
    let types = if doc.json_ld_blocks > 0 {
        vec!["JSON-LD".to_string()]
    } else if doc.microdata_items > 0 {
        vec!["Microdata".to_string()]
    } else {
        Vec::new()
    };

    let (status, message) = if types.is_empty() {
        (Status::Warning, "No structured data found")
    } else {
        (Status::Pass, "Structured data found")
    };

    CheckResult::new(status, message, Evidence::Schema { types })
}

/// pass when robots.txt answered 200, else warning
pub fn check_robots(has_robots: bool) -> CheckResult {
    let (status, message) = if has_robots {
        (Status::Pass, "Robots.txt found")
    } else {
        (Status::Warning, "No robots.txt found")
    };

    CheckResult::new(status, message, Evidence::Robots { has_robots })
}

/// pass when an <a> or <link> href mentions "sitemap", else warning
pub fn check_sitemap(doc: &PageDocument) -> CheckResult {
    let has_sitemap = doc.sitemap_refs > 0;

    let (status, message) = if has_sitemap {
        (Status::Pass, "Sitemap reference found")
    } else {
        (Status::Warning, "No sitemap reference found")
    };

    CheckResult::new(status, message, Evidence::Sitemap { has_sitemap })
}

/// pass with og:title and og:description, warning with one, fail with none
pub fn check_social(doc: &PageDocument) -> CheckResult {
    let og_title = present(&doc.og_title);
    let og_description = present(&doc.og_description);

    let (status, message) = match (og_title, og_description) {
        (true, true) => (Status::Pass, "Social media tags configured"),
        (true, false) | (false, true) => (Status::Warning, "Partial social media tags"),
        (false, false) => (Status::Fail, "No social media tags found"),
    };

    let og_tags = [og_title, og_description, present(&doc.og_image)]
        .into_iter()
        .filter(|&p| p)
        .count();
    let twitter_tags = [present(&doc.twitter_card), present(&doc.twitter_title)]
        .into_iter()
        .filter(|&p| p)
        .count();

    CheckResult::new(
        status,
        message,
        Evidence::Social {
            og_tags,
            twitter_tags,
        },
    )
}

// Present and non-empty
fn present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.is_empty())
}
