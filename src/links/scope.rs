// src/links/scope.rs
// =============================================================================
// This module decides which links belong to the website we are crawling.
//
// A link is "in scope" when its scheme, host and port (together: the origin,
// or authority) are exactly the same as the start URL's. Path, query and
// fragment don't matter.
//
// Exact match, not suffix match:
//   start = https://example.org
//   https://example.org/about      -> in scope
//   https://sub.example.org/about  -> out of scope
//   http://example.org/about       -> out of scope (different scheme)
//
// Rust concepts:
// - url::Origin: The (scheme, host, port) tuple, comparable with ==
// - HashSet: Collapses duplicate links found on the same page
// =============================================================================

use std::collections::HashSet;
use url::{Origin, Url};

// Checks whether a URL string has the same authority as the start URL
//
// Malformed URLs are never in scope (returns false instead of an error).
pub fn is_same_authority(candidate: &str, start: &Url) -> bool {
    match Url::parse(candidate) {
        Ok(url) => same_origin(&url.origin(), &start.origin()),
        Err(_) => false,
    }
}

// Opaque origins (mailto:, data:, file:, ...) never match anything,
// not even themselves
fn same_origin(a: &Origin, b: &Origin) -> bool {
    a.is_tuple() && a == b
}

/// The crawl boundary: the start URL and its authority, parsed once.
#[derive(Debug, Clone)]
pub struct Scope {
    start: Url,
    authority: Origin,
}

impl Scope {
    pub fn new(start: Url) -> Self {
        let authority = start.origin();
        Self { start, authority }
    }

    pub fn start(&self) -> &Url {
        &self.start
    }

    /// The start URL's network authority, e.g. `https://example.com:8080`.
    pub fn authority(&self) -> &Origin {
        &self.authority
    }

    /// Same check as [`is_same_authority`], against the stored start URL.
    pub fn is_same_authority(&self, candidate: &str) -> bool {
        is_same_authority(candidate, &self.start)
    }

    /// Same check for an already parsed URL.
    pub fn contains(&self, url: &Url) -> bool {
        same_origin(&url.origin(), &self.authority)
    }

    // Turns the raw hrefs of one page into absolute, in-scope URLs
    //
    // Parameters:
    //   raw_links: href values exactly as extracted from the page
    //   current_page: the URL of the page they were found on
    //
    // Returns: HashSet<Url> (duplicates collapsed, no ordering)
    //
    // Examples (current_page = https://example.com/docs/intro):
    //   ""                        -> dropped
    //   "/about"                  -> https://example.com/about
    //   "setup"                   -> https://example.com/docs/setup
    //   "#install"                -> https://example.com/docs/intro#install
    //   "//example.com/blog"      -> https://example.com/blog
    //   "https://other.com/"      -> dropped (out of scope)
    //   "mailto:me@example.com"   -> dropped (out of scope)
    pub fn resolve_and_filter<S: AsRef<str>>(
        &self,
        raw_links: &[S],
        current_page: &Url,
    ) -> HashSet<Url> {
        raw_links
            .iter()
            .map(AsRef::as_ref)
            .filter(|href| !href.is_empty())
            .filter_map(|href| current_page.join(href).ok())
            .filter(|url| self.contains(url))
            .collect()
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What does Url::join do?
//    - Resolves a link the same way a browser does
//    - "/about" keeps the scheme and host, replaces the path
//    - "setup" replaces only the last path segment
//    - "//host/x" keeps only the scheme
//    - "https://other.com" is already absolute and is returned as-is
//
// 2. What is an origin?
//    - The (scheme, host, port) part of a URL
//    - https://example.com and https://example.com:443 have the same origin
//      because 443 is the default port for https
//    - URLs like mailto: have an "opaque" origin that equals nothing
// -----------------------------------------------------------------------------
