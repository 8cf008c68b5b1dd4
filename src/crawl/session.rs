// src/crawl/session.rs
// =============================================================================
// This module runs one crawl from a start URL until there is nothing left.
//
// How it works (for each URL):
// 1. Skip it if it's out of scope or somebody already claimed it
// 2. Claim it (mark as visited) BEFORE fetching, so it's fetched only once
// 3. Fetch the page (waiting for a free worker first)
// 4. Extract hrefs, resolve them, keep the same-host ones
// 5. Keep only links never seen before, count them
// 6. Spawn one task per new link and wait for all of them
//
// A page that fails to download is recorded and its subtree stops there.
// Nothing else is affected.
//
// Rust concepts:
// - Arc<T>: Shared ownership, so every spawned task can reach the session
// - BoxFuture: A crawl task spawns more crawl tasks, and a recursive async
//   function needs a boxed (heap allocated) future to have a known size
// - Semaphore: Limits how many fetches run at once
// - AtomicUsize: A counter many tasks can bump without a lock
// =============================================================================

use super::{CrawlError, Frontier};
use crate::fetch::Fetch;
use crate::links::{self, Scope};
use futures::future::{BoxFuture, FutureExt};
use serde::Serialize;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{Mutex, Semaphore};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};
use url::Url;

/// A page that could not be crawled, and why.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FailedPage {
    pub url: String,
    pub error: String,
}

/// The outcome of a finished crawl.
#[derive(Debug, Clone, Serialize)]
pub struct CrawlReport {
    pub start_url: String,
    /// Distinct in-scope links discovered, not counting the start URL
    pub new_links: usize,
    /// Pages we tried to fetch, successful or not
    pub pages_visited: usize,
    pub failures: Vec<FailedPage>,
    pub elapsed_secs: f64,
}

// What one crawl task (and everything it spawned) did.
// Children hand this back to their parent, so no shared state is needed.
#[derive(Debug, Default)]
struct Subtree {
    pages_visited: usize,
    failures: Vec<FailedPage>,
}

impl Subtree {
    fn merge(&mut self, child: Subtree) {
        self.pages_visited += child.pages_visited;
        self.failures.extend(child.failures);
    }
}

/// One crawl of one website.
pub struct CrawlSession<F> {
    shared: Arc<Shared<F>>,
}

// Everything the crawl tasks share
struct Shared<F> {
    scope: Scope,
    frontier: Mutex<Frontier>,
    new_links: AtomicUsize,
    workers: Semaphore,
    max_workers: NonZeroUsize,
    fetcher: F,
}

impl<F: Fetch + 'static> CrawlSession<F> {
    // Creates a crawl session
    //
    // Parameters:
    //   start_url: absolute seed URL, e.g. "https://example.com"
    //   max_workers: how many pages may be fetched at the same time
    //   fetcher: anything that can download a page
    //
    // Fails if the start URL can't be parsed, or has no host (mailto:, file:)
    pub fn new(start_url: &str, max_workers: NonZeroUsize, fetcher: F) -> Result<Self, CrawlError> {
        let start = Url::parse(start_url).map_err(|source| CrawlError::InvalidStartUrl {
            url: start_url.to_string(),
            source,
        })?;

        if !start.origin().is_tuple() {
            return Err(CrawlError::OpaqueOrigin {
                url: start_url.to_string(),
            });
        }

        Ok(Self {
            shared: Arc::new(Shared {
                scope: Scope::new(start),
                frontier: Mutex::new(Frontier::new()),
                new_links: AtomicUsize::new(0),
                workers: Semaphore::new(max_workers.get()),
                max_workers,
                fetcher,
            }),
        })
    }

    pub fn start_url(&self) -> &Url {
        self.shared.scope.start()
    }

    pub fn max_workers(&self) -> NonZeroUsize {
        self.shared.max_workers
    }

    /// Distinct new links counted so far.
    pub fn new_link_count(&self) -> usize {
        self.shared.new_links.load(Ordering::SeqCst)
    }

    // Crawls the whole site and returns once every page has been handled
    pub async fn start(&self) -> CrawlReport {
        let started = Instant::now();
        let start_url = self.start_url().clone();

        let subtree = Arc::clone(&self.shared).crawl(start_url.clone()).await;

        let new_links = self.new_link_count();
        info!(new_links, "total number of unique new links found");

        CrawlReport {
            start_url: start_url.to_string(),
            new_links,
            pages_visited: subtree.pages_visited,
            failures: subtree.failures,
            elapsed_secs: started.elapsed().as_secs_f64(),
        }
    }
}

impl<F: Fetch + 'static> Shared<F> {
    // Crawls one URL and, recursively, every new link found on it
    //
    // Returns a boxed future because it spawns copies of itself
    fn crawl(self: Arc<Self>, url: Url) -> BoxFuture<'static, Subtree> {
        async move {
            let mut subtree = Subtree::default();

            // Base case: out of scope, or already visited / in flight
            if !self.scope.contains(&url) || !self.frontier.lock().await.claim(url.as_str()) {
                return subtree;
            }

            info!(url = %url, "checking");
            subtree.pages_visited += 1;

            // Only the fetch holds a worker; waiting on children below doesn't
            let fetched = {
                let Ok(_permit) = self.workers.acquire().await else {
                    return subtree;
                };
                self.fetcher.fetch(&url).await
            };

            let page = match fetched {
                Ok(page) => page,
                Err(e) => {
                    warn!(url = %url, error = %e, "error crawling");
                    subtree.failures.push(FailedPage {
                        url: url.to_string(),
                        error: e.to_string(),
                    });
                    return subtree;
                }
            };

            debug!(url = %url, status = page.status, bytes = page.body.len(), "fetched");

            let raw_links = links::extract_links(&page.body);
            let in_scope = self.scope.resolve_and_filter(&raw_links, &url);

            info!(url = %url, count = in_scope.len(), "in-scope links found on this page");
            for link in &in_scope {
                info!(page = %url, link = %link, "found");
            }

            let fresh = self.frontier.lock().await.admit(in_scope);
            self.new_links.fetch_add(fresh.len(), Ordering::SeqCst);

            // Fan out, then wait for every child before returning
            let mut children = JoinSet::new();
            for link in fresh {
                children.spawn(Arc::clone(&self).crawl(link));
            }

            while let Some(joined) = children.join_next().await {
                match joined {
                    Ok(child) => subtree.merge(child),
                    Err(e) => error!(parent = %url, error = %e, "crawl task failed"),
                }
            }

            subtree
        }
        .boxed()
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why claim a URL before fetching it?
//    - Two pages can link to the same URL and be processed at the same time
//    - If we only marked it visited after the fetch, both tasks would fetch it
//    - claim() checks and inserts under one lock, so exactly one task wins
//
// 2. Why does the permit only cover the fetch?
//    - A parent task waits for its children to finish
//    - If the parent kept its permit while waiting, with --workers 1 the
//      children could never get one and the crawl would hang forever
//
// 3. What is JoinSet?
//    - A collection of spawned tasks you can await one by one
//    - join_next() returns results in completion order, not spawn order
//    - A panicking child shows up as Err(JoinError) instead of crashing us
//
// 4. Why tokio::sync::Mutex and not std::sync::Mutex?
//    - It's locked from async code and its guard is Send
//    - The lock is never held across a fetch, only for set operations
// -----------------------------------------------------------------------------
