// src/fetch/retry.rs
// =============================================================================
// This module retries a fetch when the failure looks temporary.
//
// `Retrying` wraps any other `Fetch` (usually HttpFetcher) and implements
// `Fetch` itself, so the crawler doesn't know or care that retries happen.
//
// What gets retried:
// - Status codes in the policy's list (500, 502, 503, 504 by default)
// - Timeouts
//
// What doesn't:
// - 4xx client errors, redirect loops, connection failures
//
// Backoff between attempts (backoff_factor = 0.5):
//   retry 1 -> no wait
//   retry 2 -> 1.0s
//   retry 3 -> 2.0s
//   retry n -> backoff_factor * 2^(n-1), capped at 120s
// =============================================================================

use super::{Fetch, FetchError, Page};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;
use url::Url;

// Upper bound for a single backoff sleep
const BACKOFF_MAX_SECS: f64 = 120.0;

/// How many times to retry, how long to wait, and which statuses count as transient.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff_factor: f64,
    pub status_forcelist: Vec<u16>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_factor: 0.5,
            status_forcelist: vec![500, 502, 503, 504],
        }
    }
}

impl RetryPolicy {
    /// Whether this error is worth another attempt.
    pub fn is_retryable(&self, error: &FetchError) -> bool {
        match error {
            FetchError::Status(code) => self.status_forcelist.contains(code),
            FetchError::Timeout => true,
            _ => false,
        }
    }

    /// How long to sleep before the given retry (1-based).
    pub fn backoff(&self, retry: u32) -> Duration {
        if retry <= 1 {
            return Duration::ZERO;
        }
        let secs = self.backoff_factor * 2f64.powi(retry as i32 - 1);
        // Negative or NaN factors just mean "don't wait"
        Duration::try_from_secs_f64(secs.min(BACKOFF_MAX_SECS)).unwrap_or(Duration::ZERO)
    }
}

/// A fetcher that retries its inner fetcher according to a [`RetryPolicy`].
#[derive(Debug, Clone)]
pub struct Retrying<F> {
    inner: F,
    policy: RetryPolicy,
}

impl<F> Retrying<F> {
    pub fn new(inner: F, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

#[async_trait]
impl<F: Fetch> Fetch for Retrying<F> {
    async fn fetch(&self, url: &Url) -> Result<Page, FetchError> {
        let mut retries = 0;

        loop {
            let error = match self.inner.fetch(url).await {
                Ok(page) => return Ok(page),
                Err(error) => error,
            };

            if !self.policy.is_retryable(&error) {
                return Err(error);
            }

            if retries >= self.policy.max_retries {
                return Err(FetchError::RetriesExhausted {
                    attempts: retries + 1,
                    last: Box::new(error),
                });
            }

            retries += 1;
            let delay = self.policy.backoff(retries);
            debug!(url = %url, error = %error, retry = retries, ?delay, "retrying fetch");
            tokio::time::sleep(delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    // Returns the scripted results in order, then keeps repeating the last one
    struct Scripted {
        results: Mutex<VecDeque<Result<Page, FetchError>>>,
        calls: AtomicU32,
    }

    impl Scripted {
        fn new(results: Vec<Result<Page, FetchError>>) -> Self {
            Self {
                results: Mutex::new(results.into()),
                calls: AtomicU32::new(0),
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Fetch for Scripted {
        async fn fetch(&self, _url: &Url) -> Result<Page, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut results = self.results.lock().unwrap();
            if results.len() > 1 {
                results.pop_front().unwrap()
            } else {
                results.front().cloned().unwrap()
            }
        }
    }

    fn ok_page() -> Result<Page, FetchError> {
        Ok(Page {
            status: 200,
            body: "<html></html>".to_string(),
        })
    }

    fn no_wait() -> RetryPolicy {
        RetryPolicy {
            backoff_factor: 0.0,
            ..RetryPolicy::default()
        }
    }

    fn url() -> Url {
        Url::parse("https://example.com/").unwrap()
    }

    #[test]
    fn test_backoff_schedule() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff(1), Duration::ZERO);
        assert_eq!(policy.backoff(2), Duration::from_secs(1));
        assert_eq!(policy.backoff(3), Duration::from_secs(2));
        assert_eq!(policy.backoff(4), Duration::from_secs(4));
        assert_eq!(policy.backoff(30), Duration::from_secs(120));
    }

    #[test]
    fn test_negative_backoff_factor_means_no_wait() {
        let policy = RetryPolicy {
            backoff_factor: -1.0,
            ..RetryPolicy::default()
        };
        assert_eq!(policy.backoff(3), Duration::ZERO);
    }

    #[test]
    fn test_retryable_errors() {
        let policy = RetryPolicy::default();
        assert!(policy.is_retryable(&FetchError::Status(500)));
        assert!(policy.is_retryable(&FetchError::Status(503)));
        assert!(policy.is_retryable(&FetchError::Timeout));
        assert!(!policy.is_retryable(&FetchError::Status(501)));
        assert!(!policy.is_retryable(&FetchError::Status(404)));
        assert!(!policy.is_retryable(&FetchError::TooManyRedirects));
        assert!(!policy.is_retryable(&FetchError::Connect("refused".to_string())));
    }

    #[tokio::test]
    async fn test_recovers_after_transient_errors() {
        let inner = Scripted::new(vec![
            Err(FetchError::Status(503)),
            Err(FetchError::Timeout),
            ok_page(),
        ]);
        let fetcher = Retrying::new(inner, no_wait());

        let result = fetcher.fetch(&url()).await;

        assert_eq!(result, ok_page());
        assert_eq!(fetcher.inner.calls(), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let inner = Scripted::new(vec![Err(FetchError::Status(502))]);
        let fetcher = Retrying::new(inner, no_wait());

        let result = fetcher.fetch(&url()).await;

        assert_eq!(
            result,
            Err(FetchError::RetriesExhausted {
                attempts: 4,
                last: Box::new(FetchError::Status(502)),
            })
        );
        assert_eq!(fetcher.inner.calls(), 4);
    }

    #[tokio::test]
    async fn test_permanent_errors_are_not_retried() {
        let inner = Scripted::new(vec![Err(FetchError::Status(404))]);
        let fetcher = Retrying::new(inner, no_wait());

        assert_eq!(fetcher.fetch(&url()).await, Err(FetchError::Status(404)));
        assert_eq!(fetcher.inner.calls(), 1);
    }

    #[tokio::test]
    async fn test_zero_retries() {
        let inner = Scripted::new(vec![Err(FetchError::Timeout), ok_page()]);
        let policy = RetryPolicy {
            max_retries: 0,
            ..no_wait()
        };
        let fetcher = Retrying::new(inner, policy);

        let result = fetcher.fetch(&url()).await;

        assert!(matches!(
            result,
            Err(FetchError::RetriesExhausted { attempts: 1, .. })
        ));
        assert_eq!(fetcher.inner.calls(), 1);
    }

    #[tokio::test]
    async fn test_retries_real_http_server_errors() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/busy")
            .with_status(503)
            .expect(4)
            .create_async()
            .await;

        let http = crate::fetch::HttpFetcher::new(Duration::from_secs(5)).unwrap();
        let fetcher = Retrying::new(http, no_wait());
        let busy = Url::parse(&format!("{}/busy", server.url())).unwrap();

        let result = fetcher.fetch(&busy).await;

        assert!(matches!(
            result,
            Err(FetchError::RetriesExhausted { attempts: 4, .. })
        ));
        mock.assert_async().await;
    }
}
