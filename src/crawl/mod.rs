// src/crawl/mod.rs
// =============================================================================
// This module handles website crawling.
//
// Features:
// - Recursive crawling starting from a URL, one task per page
// - Respects same-host restriction (doesn't crawl external sites)
// - Every URL is fetched at most once, even when many pages link to it
// - At most `workers` fetches run at the same time
//
// Submodules:
// - frontier: The visited / discovered URL sets
// - session: The crawl itself and the final report
//
// Rust concepts:
// - Arc + Mutex: Sharing state between tasks safely
// - tokio::task::JoinSet: Waiting for a group of spawned tasks
// =============================================================================

mod frontier;
mod session;

pub use frontier::Frontier;
pub use session::{CrawlReport, CrawlSession, FailedPage};

use thiserror::Error;

/// Errors that stop a crawl from being created.
///
/// Once a crawl is running nothing is fatal: failed pages end up in
/// [`CrawlReport::failures`].
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("invalid start URL '{url}': {source}")]
    InvalidStartUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("start URL '{url}' has no host to stay on")]
    OpaqueOrigin { url: String },
}
