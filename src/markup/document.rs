// src/markup/document.rs
// =============================================================================
// HTML -> PageDocument extraction.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (html5ever, so broken markup is repaired the way
//   browsers repair it)
// - Supports CSS selectors for finding elements
//
// Extraction never fails. An empty or garbage body simply yields an empty
// snapshot, and the checks then report their worst case.
// =============================================================================

use scraper::{ElementRef, Html, Selector};

/// Heading text is cut to this many characters
const HEADING_TEXT_LIMIT: usize = 100;

/// One h1..h6 element, in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    /// Lowercase tag name, e.g. "h2"
    pub tag: String,
    pub text: String,
    pub level: u8,
}

/// One <img> element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub src: Option<String>,
    pub alt: Option<String>,
}

impl Image {
    /// An alt attribute that is present and non-empty
    pub fn has_alt(&self) -> bool {
        self.alt.as_deref().is_some_and(|alt| !alt.is_empty())
    }
}

/// One <a href> element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    pub href: String,
    pub rel: Option<String>,
}

/// Everything the check battery reads from a page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageDocument {
    /// Text of every <title>, concatenated and trimmed
    pub title: String,
    pub meta_description: Option<String>,
    pub viewport: Option<String>,
    pub og_title: Option<String>,
    pub og_description: Option<String>,
    pub og_image: Option<String>,
    pub twitter_card: Option<String>,
    pub twitter_title: Option<String>,
    pub headings: Vec<Heading>,
    pub images: Vec<Image>,
    pub anchors: Vec<Anchor>,
    /// <a> and <link> elements whose href mentions "sitemap"
    pub sitemap_refs: usize,
    /// <script type="application/ld+json"> blocks
    pub json_ld_blocks: usize,
    /// Elements carrying an itemscope attribute
    pub microdata_items: usize,
}

/// Parses an HTML body into a PageDocument
pub fn parse_document(html: &str) -> PageDocument {
    let doc = Html::parse_document(html);

    let title = select_all(&doc, "title")
        .map(|el| el.text().collect::<String>())
        .collect::<String>()
        .trim()
        .to_string();

    let headings = select_all(&doc, "h1, h2, h3, h4, h5, h6")
        .map(|el| {
            let tag = el.value().name().to_ascii_lowercase();
            let text = el.text().collect::<String>();
            Heading {
                level: tag.trim_start_matches('h').parse().unwrap_or(0),
                text: text.trim().chars().take(HEADING_TEXT_LIMIT).collect(),
                tag,
            }
        })
        .collect();

    let images = select_all(&doc, "img")
        .map(|el| Image {
            src: el.value().attr("src").map(str::to_string),
            alt: el.value().attr("alt").map(str::to_string),
        })
        .collect();

    let anchors = select_all(&doc, "a[href]")
        .filter_map(|el| {
            let href = el.value().attr("href")?;
            Some(Anchor {
                href: href.to_string(),
                rel: el.value().attr("rel").map(str::to_string),
            })
        })
        .collect();

    PageDocument {
        title,
        meta_description: first_attr(&doc, r#"meta[name="description"]"#, "content"),
        viewport: first_attr(&doc, r#"meta[name="viewport"]"#, "content"),
        og_title: first_attr(&doc, r#"meta[property="og:title"]"#, "content"),
        og_description: first_attr(&doc, r#"meta[property="og:description"]"#, "content"),
        og_image: first_attr(&doc, r#"meta[property="og:image"]"#, "content"),
        twitter_card: first_attr(&doc, r#"meta[name="twitter:card"]"#, "content"),
        twitter_title: first_attr(&doc, r#"meta[name="twitter:title"]"#, "content"),
        headings,
        images,
        anchors,
        sitemap_refs: select_all(&doc, r#"a[href*="sitemap"], link[href*="sitemap"]"#).count(),
        json_ld_blocks: select_all(&doc, r#"script[type="application/ld+json"]"#).count(),
        microdata_items: select_all(&doc, "[itemscope]").count(),
    }
}

// Runs a CSS selector; an unparsable selector matches nothing
fn select_all<'a>(doc: &'a Html, css: &str) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    let selector = Selector::parse(css).ok();
    selector
        .into_iter()
        .flat_map(move |sel| doc.select(&sel).collect::<Vec<_>>())
}

// Attribute of the first element matching the selector
fn first_attr(doc: &Html, css: &str, attr: &str) -> Option<String> {
    select_all(doc, css)
        .next()
        .and_then(|el| el.value().attr(attr).map(str::to_string))
}
