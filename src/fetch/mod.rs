// src/fetch/mod.rs
// =============================================================================
// Outbound HTTP for an audit: the target page and its robots.txt.
//
// The engine only sees the `PageFetcher` trait, so tests can swap in a stub
// that never touches the network and counts how often it was called.
//
// - http: the reqwest fetcher, redirect policy and body decoding
// - dns:  range-checked resolution for hosts reached by redirect
// =============================================================================

mod dns;
mod http;

pub use http::{HttpFetcher, PageFetcher};

#[cfg(test)]
pub use http::FetchedDocument;
