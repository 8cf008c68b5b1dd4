// src/fetch/mod.rs
// =============================================================================
// This module is everything the crawler needs to download a page.
//
// Submodules:
// - http: The real HTTP client (one request, one attempt)
// - retry: A wrapper that retries another fetcher on transient failures
//
// The crawler only knows about the `Fetch` trait defined here, so tests can
// swap in an in-memory fetcher instead of hitting the network.
//
// Rust concepts:
// - Traits: A shared interface several types can implement
// - async-trait: Lets trait methods be async and still be used as generics
// - thiserror: Derives std::error::Error for our own error enum
// =============================================================================

mod http;
mod retry;

pub use http::HttpFetcher;
pub use retry::{RetryPolicy, Retrying};

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

/// A successfully downloaded page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub status: u16,
    pub body: String,
}

/// Why a page could not be downloaded.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// The server answered with a non-success status code
    #[error("HTTP {0}")]
    Status(u16),

    /// Request timed out
    #[error("request timed out")]
    Timeout,

    /// Redirect loop or redirect limit reached
    #[error("too many redirects")]
    TooManyRedirects,

    /// Could not connect (DNS failure, refused, unreachable)
    #[error("connection failed: {0}")]
    Connect(String),

    /// Any other transport error
    #[error("{0}")]
    Request(String),

    /// A transient error that kept happening until we ran out of retries
    #[error("gave up after {attempts} attempts, last error: {last}")]
    RetriesExhausted { attempts: u32, last: Box<FetchError> },
}

/// Downloads a single page.
///
/// Implementations return `Ok` only for pages whose body should be parsed.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<Page, FetchError>;
}
