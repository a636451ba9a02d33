// src/checks/content.rs
// =============================================================================
// On-page content checks: title, meta description, headings, image alt text.
//
// Lengths are counted in characters (Unicode scalar values), not bytes, so
// a title full of accented letters isn't penalized for its encoding.
// =============================================================================

use super::{CheckResult, Evidence, HeadingEntry, Status};
use crate::markup::PageDocument;

const TITLE_MAX_CHARS: usize = 60;
const DESCRIPTION_MAX_CHARS: usize = 160;
/// Alt coverage (rounded percent) needed to pass / to avoid failing
const ALT_PASS_PERCENT: u32 = 90;
const ALT_WARN_PERCENT: u32 = 70;
const MISSING_ALT_REPORTED: usize = 5;

/// pass: 1-60 chars, warning: over 60, fail: missing or empty
pub fn check_title(doc: &PageDocument) -> CheckResult {
    let length = doc.title.chars().count();

    let (status, message) = if length == 0 {
        (Status::Fail, "No title tag found".to_string())
    } else if length > TITLE_MAX_CHARS {
        (Status::Warning, format!("Title is too long ({} characters)", length))
    } else {
        (Status::Pass, "Title tag is optimal".to_string())
    };

    CheckResult::new(
        status,
        message,
        Evidence::Text {
            value: doc.title.clone(),
            length,
        },
    )
}

/// pass: 1-160 chars, warning: over 160, fail: missing or empty
pub fn check_description(doc: &PageDocument) -> CheckResult {
    let value = doc.meta_description.clone().unwrap_or_default();
    let length = value.chars().count();

    let (status, message) = if length == 0 {
        (Status::Fail, "No meta description found".to_string())
    } else if length > DESCRIPTION_MAX_CHARS {
        (
            Status::Warning,
            format!("Meta description is too long ({} characters)", length),
        )
    } else {
        (Status::Pass, "Meta description is optimal".to_string())
    };

    CheckResult::new(status, message, Evidence::Text { value, length })
}

/// pass: exactly one h1, fail: no headings at all, warning: anything else
pub fn check_headings(doc: &PageDocument) -> CheckResult {
    let total = doc.headings.len();
    let h1_count = doc.headings.iter().filter(|h| h.level == 1).count();

    let (status, message) = if total == 0 {
        (Status::Fail, "No headings found")
    } else if h1_count == 0 {
        (Status::Warning, "No H1 heading found")
    } else if h1_count > 1 {
        (Status::Warning, "Multiple H1 headings found")
    } else {
        (Status::Pass, "Good heading structure")
    };

    CheckResult::new(
        status,
        message,
        Evidence::Headings {
            count: total,
            structure: doc.headings.iter().map(HeadingEntry::from).collect(),
        },
    )
}

/// pass: no images or >=90% with alt, warning: 70-89%, fail: below 70%
///
/// The percentage is rounded before the thresholds apply.
pub fn check_images(doc: &PageDocument) -> CheckResult {
    let total_count = doc.images.len();
    let alt_count = doc.images.iter().filter(|img| img.has_alt()).count();
    let missing_alt = doc
        .images
        .iter()
        .filter(|img| !img.has_alt())
        .filter_map(|img| img.src.as_deref())
        .filter(|src| !src.is_empty())
        .map(str::to_string)
        .take(MISSING_ALT_REPORTED)
        .collect();

    let evidence = Evidence::Images {
        alt_count,
        total_count,
        missing_alt,
    };

    if total_count == 0 {
        return CheckResult::new(Status::Pass, "No images found", evidence);
    }

    let percent = alt_percentage(alt_count, total_count);
    let (status, message) = if percent >= ALT_PASS_PERCENT {
        (Status::Pass, format!("{}% of images have alt text", percent))
    } else if percent >= ALT_WARN_PERCENT {
        (
            Status::Warning,
            format!("{}% of images have alt text - needs improvement", percent),
        )
    } else {
        (Status::Fail, format!("Only {}% of images have alt text", percent))
    };

    CheckResult::new(status, message, evidence)
}

fn alt_percentage(alt_count: usize, total_count: usize) -> u32 {
    ((alt_count as f64 / total_count as f64) * 100.0).round() as u32
}
