// src/crawl/frontier.rs
// =============================================================================
// The crawl's memory of which URLs it has already seen.
//
// Two sets:
// - visited: URLs being fetched or already fetched. Only ever grows.
// - discovered: URLs found on some page but whose crawl hasn't started yet.
//
// A URL moves discovered -> visited when its crawl starts, and never leaves
// visited again. The session keeps one Frontier behind a Mutex so each
// method below runs as a single critical section.
// =============================================================================

use std::collections::HashSet;
use url::Url;

#[derive(Debug, Default)]
pub struct Frontier {
    visited: HashSet<String>,
    discovered: HashSet<String>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    // Marks a URL as visited if nobody claimed it before
    //
    // Returns: true if the caller now owns the fetch of this URL,
    //          false if it was already visited (or in flight)
    pub fn claim(&mut self, url: &str) -> bool {
        if !self.visited.insert(url.to_string()) {
            return false;
        }
        self.discovered.remove(url);
        true
    }

    // Records the links found on a page
    //
    // Returns: the links that were neither visited nor already discovered.
    // Those are now in `discovered`, and the caller is the only one who got
    // them back, so it's the one that should crawl them.
    pub fn admit(&mut self, links: impl IntoIterator<Item = Url>) -> Vec<Url> {
        links
            .into_iter()
            .filter(|link| {
                !self.visited.contains(link.as_str())
                    && self.discovered.insert(link.as_str().to_string())
            })
            .collect()
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    pub fn visited_len(&self) -> usize {
        self.visited.len()
    }

    pub fn discovered_len(&self) -> usize {
        self.discovered.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urls(list: &[&str]) -> Vec<Url> {
        list.iter().map(|u| Url::parse(u).unwrap()).collect()
    }

    #[test]
    fn test_claim_is_exactly_once() {
        let mut frontier = Frontier::new();
        assert!(frontier.claim("https://example.com/"));
        assert!(!frontier.claim("https://example.com/"));
        assert!(frontier.is_visited("https://example.com/"));
        assert_eq!(frontier.visited_len(), 1);
    }

    #[test]
    fn test_admit_skips_visited_and_discovered() {
        let mut frontier = Frontier::new();
        frontier.claim("https://example.com/");

        let fresh = frontier.admit(urls(&["https://example.com/", "https://example.com/a"]));
        assert_eq!(fresh, urls(&["https://example.com/a"]));

        // Found again on another page before its crawl started
        let fresh = frontier.admit(urls(&["https://example.com/a", "https://example.com/b"]));
        assert_eq!(fresh, urls(&["https://example.com/b"]));
        assert_eq!(frontier.discovered_len(), 2);
    }

    #[test]
    fn test_claim_moves_url_out_of_discovered() {
        let mut frontier = Frontier::new();
        frontier.admit(urls(&["https://example.com/a"]));
        assert_eq!(frontier.discovered_len(), 1);

        assert!(frontier.claim("https://example.com/a"));
        assert_eq!(frontier.discovered_len(), 0);

        // Visited URLs are never handed out again
        assert!(frontier.admit(urls(&["https://example.com/a"])).is_empty());
    }
}
