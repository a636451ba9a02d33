// src/report/recommendations.rs
// =============================================================================
// Canned advice per check.
//
// Each check contributes at most one line, only when it did not pass, and
// the list follows check declaration order rather than severity.
// =============================================================================

use crate::checks::{CheckName, CheckSet, Status};

/// The advice shown when `check` does not pass
pub fn recommendation(check: CheckName) -> &'static str {
    match check {
        CheckName::Title => "Add a compelling title tag between 30-60 characters",
        CheckName::Description => "Create a meta description between 120-160 characters",
        CheckName::Headings => "Improve heading structure with proper H1 and hierarchical headings",
        CheckName::Images => "Add alt text to all images for better accessibility and SEO",
        CheckName::Mobile => "Add mobile viewport meta tag for responsive design",
        CheckName::Ssl => "Implement HTTPS for better security and SEO rankings",
        CheckName::InternalLinks => {
            "Add internal links to help visitors and search engines discover related pages"
        }
        CheckName::ExternalLinks => {
            "Link to relevant, authoritative external sources to support your content"
        }
        CheckName::Schema => {
            "Add structured data markup to help search engines understand your content"
        }
        CheckName::Robots => "Create a robots.txt file to guide search engine crawlers",
        CheckName::Sitemap => "Create and submit an XML sitemap to search engines",
        CheckName::Social => "Add Open Graph and Twitter Card meta tags for social media sharing",
    }
}

/// Advice for every check that did not pass, in declaration order
pub fn recommendations(checks: &CheckSet) -> Vec<String> {
    checks
        .iter()
        .filter(|(_, result)| result.status != Status::Pass)
        .map(|(name, _)| recommendation(name).to_string())
        .collect()
}
