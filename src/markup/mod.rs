// src/markup/mod.rs
// =============================================================================
// Turns fetched HTML into a `PageDocument`: a plain, owned snapshot of every
// element the checks look at.
//
// scraper's `Html` tree is built on non-atomic tendrils, so it can't be
// shared across tasks. Extracting once into owned Strings and Vecs gives the
// checks an immutable value that is Send + Sync and cheap to read.
// =============================================================================

mod document;

pub use document::{parse_document, Heading, PageDocument};

#[cfg(test)]
pub use document::Image;
