// src/checks/mod.rs
// =============================================================================
// The check battery: 12 independent heuristics over one parsed page.
//
// Submodules:
// - content: title, description, headings, images
// - links: internal and external link counts
// - meta: mobile viewport, TLS, structured data, robots.txt, sitemap,
//   social tags
//
// Every check is a pure function of (PageDocument, target URL, robots.txt
// present). They never short-circuit each other and always produce one of
// exactly three statuses.
// =============================================================================

mod content;
mod links;
mod meta;

use serde::Serialize;
use url::Url;

use crate::markup::{Heading, PageDocument};

/// Verdict of a single check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Pass,
    Warning,
    Fail,
}

/// The closed set of checks, in declaration order
///
/// Adding a variant forces every `match` on it (recommendations,
/// `CheckSet::get`) to be updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CheckName {
    Title,
    Description,
    Headings,
    Images,
    Mobile,
    Ssl,
    InternalLinks,
    ExternalLinks,
    Schema,
    Robots,
    Sitemap,
    Social,
}

impl CheckName {
    pub const ALL: [CheckName; 12] = [
        CheckName::Title,
        CheckName::Description,
        CheckName::Headings,
        CheckName::Images,
        CheckName::Mobile,
        CheckName::Ssl,
        CheckName::InternalLinks,
        CheckName::ExternalLinks,
        CheckName::Schema,
        CheckName::Robots,
        CheckName::Sitemap,
        CheckName::Social,
    ];

    /// Key used for this check in the report JSON
    pub fn key(self) -> &'static str {
        match self {
            CheckName::Title => "title",
            CheckName::Description => "description",
            CheckName::Headings => "headings",
            CheckName::Images => "images",
            CheckName::Mobile => "mobile",
            CheckName::Ssl => "ssl",
            CheckName::InternalLinks => "internalLinks",
            CheckName::ExternalLinks => "externalLinks",
            CheckName::Schema => "schema",
            CheckName::Robots => "robots",
            CheckName::Sitemap => "sitemap",
            CheckName::Social => "social",
        }
    }
}

/// Check-specific evidence, flattened next to status and message in JSON
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Evidence {
    /// title, description
    Text { value: String, length: usize },
    Headings {
        count: usize,
        structure: Vec<HeadingEntry>,
    },
    #[serde(rename_all = "camelCase")]
    Images {
        alt_count: usize,
        total_count: usize,
        missing_alt: Vec<String>,
    },
    Viewport { viewport: String },
    Ssl { valid: bool },
    /// `broken` stays 0: links are counted, not probed
    InternalLinks { count: usize, broken: usize },
    ExternalLinks { count: usize, nofollow: usize },
    Schema { types: Vec<String> },
    #[serde(rename_all = "camelCase")]
    Robots { has_robots: bool },
    #[serde(rename_all = "camelCase")]
    Sitemap { has_sitemap: bool },
    #[serde(rename_all = "camelCase")]
    Social { og_tags: usize, twitter_tags: usize },
}

/// A heading as reported in the headings evidence
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeadingEntry {
    pub tag: String,
    pub text: String,
    pub level: u8,
}

impl From<&Heading> for HeadingEntry {
    fn from(heading: &Heading) -> Self {
        Self {
            tag: heading.tag.clone(),
            text: heading.text.clone(),
            level: heading.level,
        }
    }
}

/// Outcome of one check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    pub status: Status,
    pub message: String,
    #[serde(flatten)]
    pub evidence: Evidence,
}

impl CheckResult {
    pub fn new(status: Status, message: impl Into<String>, evidence: Evidence) -> Self {
        Self {
            status,
            message: message.into(),
            evidence,
        }
    }
}

/// All 12 results, serialized as the report's `checks` object
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckSet {
    pub title: CheckResult,
    pub description: CheckResult,
    pub headings: CheckResult,
    pub images: CheckResult,
    pub mobile: CheckResult,
    pub ssl: CheckResult,
    pub internal_links: CheckResult,
    pub external_links: CheckResult,
    pub schema: CheckResult,
    pub robots: CheckResult,
    pub sitemap: CheckResult,
    pub social: CheckResult,
}

impl CheckSet {
    pub fn get(&self, name: CheckName) -> &CheckResult {
        match name {
            CheckName::Title => &self.title,
            CheckName::Description => &self.description,
            CheckName::Headings => &self.headings,
            CheckName::Images => &self.images,
            CheckName::Mobile => &self.mobile,
            CheckName::Ssl => &self.ssl,
            CheckName::InternalLinks => &self.internal_links,
            CheckName::ExternalLinks => &self.external_links,
            CheckName::Schema => &self.schema,
            CheckName::Robots => &self.robots,
            CheckName::Sitemap => &self.sitemap,
            CheckName::Social => &self.social,
        }
    }

    /// (name, result) pairs in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (CheckName, &CheckResult)> + '_ {
        CheckName::ALL.into_iter().map(move |name| (name, self.get(name)))
    }
}

/// Runs the whole battery against one page
pub fn run_all(doc: &PageDocument, target: &Url, has_robots: bool) -> CheckSet {
    CheckSet {
        title: content::check_title(doc),
        description: content::check_description(doc),
        headings: content::check_headings(doc),
        images: content::check_images(doc),
        mobile: meta::check_mobile(doc),
        ssl: meta::check_ssl(target),
        internal_links: links::check_internal_links(doc, target),
        external_links: links::check_external_links(doc, target),
        schema: meta::check_schema(doc),
        robots: meta::check_robots(has_robots),
        sitemap: meta::check_sitemap(doc),
        social: meta::check_social(doc),
    }
}
