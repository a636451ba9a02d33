// src/report/mod.rs
// =============================================================================
// Aggregates the 12 check results into the AuditReport returned to callers.
//
// - overallScore = round(passed / 12 * 100)
// - issues counts fails as "critical", warnings as "warning"
// - recommendations come from a fixed table, in check declaration order
//
// Everything here is deterministic except `generatedAt`.
// =============================================================================

mod recommendations;

pub use recommendations::recommendations;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::checks::{CheckName, CheckSet, Status};

/// Number of checks in every report
pub const CHECK_COUNT: usize = CheckName::ALL.len();

/// Issue tally; the three fields always sum to CHECK_COUNT
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IssueCounts {
    pub critical: usize,
    pub warning: usize,
    pub passed: usize,
}

/// The full result of one audit
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditReport {
    pub url: String,
    pub overall_score: u8,
    pub issues: IssueCounts,
    pub checks: CheckSet,
    pub recommendations: Vec<String>,
    /// RFC 3339, UTC, millisecond precision
    pub generated_at: String,
}

/// Builds the report for a normalized URL and its check results
pub fn build_report(url: &str, checks: CheckSet) -> AuditReport {
    let issues = count_issues(&checks);

    AuditReport {
        url: url.to_string(),
        overall_score: overall_score(issues.passed),
        issues,
        recommendations: recommendations(&checks),
        checks,
        generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }
}

pub fn count_issues(checks: &CheckSet) -> IssueCounts {
    let mut issues = IssueCounts {
        critical: 0,
        warning: 0,
        passed: 0,
    };

    for (_, result) in checks.iter() {
        match result.status {
            Status::Fail => issues.critical += 1,
            Status::Warning => issues.warning += 1,
            Status::Pass => issues.passed += 1,
        }
    }

    issues
}

/// Percentage of checks passed, rounded to the nearest integer
pub fn overall_score(passed: usize) -> u8 {
    ((passed as f64 / CHECK_COUNT as f64) * 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::run_all;
    use crate::markup::{parse_document, PageDocument};
    use url::Url;

    const GOOD_PAGE: &str = r#"
        <html><head>
          <title>Acme Plumbing in Milwaukee</title>
          <meta name="description" content="Licensed plumbers, same-day service.">
          <meta name="viewport" content="width=device-width, initial-scale=1">
          <meta property="og:title" content="Acme Plumbing">
          <meta property="og:description" content="Same-day service">
          <script type="application/ld+json">{"@type":"Plumber"}</script>
        </head><body>
          <h1>Acme Plumbing</h1>
          <img src="/van.jpg" alt="Our van">
          <a href="/contact">Contact</a>
          <a href="https://bbb.org/acme">BBB</a>
          <a href="/sitemap.xml">Sitemap</a>
        </body></html>
    "#;

    fn target() -> Url {
        Url::parse("https://example.com/").unwrap()
    }

    #[test]
    fn test_perfect_page_scores_100() {
        let checks = run_all(&parse_document(GOOD_PAGE), &target(), true);
        let report = build_report("https://example.com/", checks);

        assert_eq!(report.overall_score, 100);
        assert_eq!(
            report.issues,
            IssueCounts {
                critical: 0,
                warning: 0,
                passed: 12
            }
        );
        assert!(report.recommendations.is_empty());
    }

    #[test]
    fn test_issue_counts_always_sum_to_twelve() {
        let pages = [
            "",
            GOOD_PAGE,
            "<h2>x</h2><img src=a.png><img src=b.png alt=b>",
            r#"<title>t</title><meta property="og:title" content="t">"#,
        ];
        for html in pages {
            for has_robots in [true, false] {
                let checks = run_all(&parse_document(html), &target(), has_robots);
                let report = build_report("https://example.com/", checks);
                let IssueCounts {
                    critical,
                    warning,
                    passed,
                } = report.issues;

                assert_eq!(critical + warning + passed, CHECK_COUNT);
                assert_eq!(
                    report.overall_score as f64,
                    (passed as f64 / 12.0 * 100.0).round()
                );
            }
        }
    }

    #[test]
    fn test_empty_page_counts() {
        let checks = run_all(&PageDocument::default(), &target(), false);
        let issues = count_issues(&checks);

        // fail: title, description, headings, mobile, social
        // warning: internal, external, schema, robots, sitemap
        // pass: images, ssl
        assert_eq!(issues.critical, 5);
        assert_eq!(issues.warning, 5);
        assert_eq!(issues.passed, 2);
        assert_eq!(overall_score(issues.passed), 17);
    }

    #[test]
    fn test_overall_score_rounding() {
        assert_eq!(overall_score(0), 0);
        assert_eq!(overall_score(1), 8);
        assert_eq!(overall_score(6), 50);
        assert_eq!(overall_score(11), 92);
        assert_eq!(overall_score(12), 100);
    }

    #[test]
    fn test_report_json_shape() {
        let checks = run_all(&PageDocument::default(), &target(), false);
        let report = build_report("https://example.com/", checks);
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["url"], "https://example.com/");
        assert_eq!(json["overallScore"], 17);
        assert_eq!(json["issues"]["critical"], 5);
        assert_eq!(json["checks"]["title"]["status"], "fail");
        assert_eq!(json["checks"]["externalLinks"]["status"], "warning");
        assert!(json["generatedAt"].as_str().unwrap().ends_with('Z'));
    }
}
