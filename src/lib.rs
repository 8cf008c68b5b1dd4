// src/lib.rs
// =============================================================================
// The crawler as a library. main.rs is a thin CLI on top of it.
//
// Modules, leaf-first:
// - links: HTML href extraction and same-host filtering
// - fetch: The Fetch trait, the HTTP client and the retry wrapper
// - crawl: Visited-state tracking and the recursive crawl itself
// =============================================================================

pub mod crawl;
pub mod fetch;
pub mod links;
