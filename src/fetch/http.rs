// src/fetch/http.rs
// =============================================================================
// This module downloads pages over HTTP(S) with reqwest.
//
// Key functionality:
// - One GET request per call, no retries (see retry.rs for that)
// - A timeout on every request
// - Follows a limited number of redirects
// - Turns every kind of failure into a FetchError variant
//
// Rust concepts:
// - async/await: Network I/O without blocking the thread
// - Result<T, E>: Success is a Page, failure is a FetchError
// - Builder pattern: Client::builder()...build()
// =============================================================================

use super::{Fetch, FetchError, Page};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

// How many redirects we follow before giving up on a URL
const MAX_REDIRECTS: usize = 5;

/// Single-attempt HTTP fetcher backed by a pooled reqwest client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    // Creates the fetcher
    //
    // Parameters:
    //   timeout: per-request timeout (connect + headers + body)
    //
    // The client is built once and reused for every request,
    // so connections to the site are pooled.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<Page, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(categorize_error)?;

        let status = response.status();

        // Anything outside 2xx is an error for the crawler,
        // the retry layer decides whether it's worth another try
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.text().await.map_err(categorize_error)?;

        Ok(Page {
            status: status.as_u16(),
            body,
        })
    }
}

// Categorizes different error types from reqwest
//
// reqwest errors can happen for many reasons:
// - Network timeout
// - DNS resolution failure or refused connection
// - Too many redirects
// - etc.
fn categorize_error(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout
    } else if error.is_redirect() {
        FetchError::TooManyRedirects
    } else if error.is_connect() {
        FetchError::Connect(error.to_string())
    } else {
        FetchError::Request(error.to_string())
    }
}
