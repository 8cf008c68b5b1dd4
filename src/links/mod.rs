// src/links/mod.rs
// =============================================================================
// This module turns a fetched HTML page into the set of links worth crawling.
//
// Submodules:
// - html: Pulls the raw href values out of <a> tags
// - scope: Resolves those hrefs against the page URL and keeps only the ones
//   on the same scheme + host + port as the start URL
//
// Data flow: HTML string -> raw hrefs (html) -> absolute in-scope URLs (scope)
// =============================================================================

mod html;
mod scope;

// Re-export public items so callers can write `links::extract_links()`
pub use html::extract_links;
pub use scope::{is_same_authority, Scope};
