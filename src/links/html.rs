// src/links/html.rs
// =============================================================================
// This module extracts raw href values from HTML pages.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Is built on html5ever (Mozilla's HTML parser)
// - Never gives up on broken markup: it repairs it the same way a browser does
//
// The values are returned exactly as written in the page. Resolving them
// against the page URL happens later, in scope.rs.
//
// Rust concepts:
// - Iterators: Walking the DOM tree in document order
// - Option: An href attribute may or may not be present
// =============================================================================

use scraper::{ElementRef, Html};
use tracing::debug;

// Extracts every href value found on an <a> element
//
// Parameters:
//   html: the HTML content to parse (borrowed as &str)
//
// Returns: Vec<String> of raw href values, in document order
//   - duplicates are kept
//   - empty values (href="") are kept
//   - <a> tags without an href are skipped
//   - every other tag (<link href>, <img src>, ...) is ignored
//
// Example:
//   html = "<a href='/docs'>Docs</a><a href=''>Empty</a>"
//   result = ["/docs", ""]
pub fn extract_links(html: &str) -> Vec<String> {
    // Parse the HTML into a document, exactly once
    let document = Html::parse_document(html);

    // html5ever recovers from malformed markup instead of failing,
    // so parse errors only matter for diagnostics
    if !document.errors.is_empty() {
        debug!(errors = document.errors.len(), "recovered from malformed HTML");
    }

    // descendants() walks the tree depth-first, which is document order
    document
        .tree
        .root()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|element| element.value().name() == "a")
        .filter_map(|element| element.value().attr("href"))
        .map(str::to_string)
        .collect()
}
