// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// Example:
//   site-crawler https://example.com --workers 8 --json
//
// Log verbosity is not a flag: set RUST_LOG (e.g. RUST_LOG=debug).
// =============================================================================

use clap::Parser;
use site_crawler::fetch::RetryPolicy;
use std::num::NonZeroUsize;
use std::time::Duration;

// This struct represents our entire CLI application
//
// #[derive(Parser)] tells clap to automatically generate parsing code
#[derive(Parser, Debug)]
#[command(
    name = "site-crawler",
    version,
    about = "Crawl one website and count the distinct same-host links it contains",
    long_about = "site-crawler starts at a URL, follows every <a href> that stays on the same \
                  scheme, host and port, fetches each page once, and reports how many distinct \
                  links it discovered."
)]
pub struct Cli {
    /// Website URL to start from (e.g., https://example.com)
    pub url: String,

    /// Maximum number of pages fetched at the same time
    ///
    /// NonZeroUsize makes clap reject 0 for us
    #[arg(long, default_value = "5")]
    pub workers: NonZeroUsize,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 5, value_name = "SECS")]
    pub timeout: u64,

    /// How many times a request is retried on 500/502/503/504 or timeout
    #[arg(long, default_value_t = 3)]
    pub max_retries: u32,

    /// Backoff factor in seconds; retry n waits factor * 2^(n-1) (first retry is immediate)
    #[arg(long, default_value_t = 0.5, value_parser = parse_backoff_factor)]
    pub backoff_factor: f64,

    /// Output the report in JSON format instead of text
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            backoff_factor: self.backoff_factor,
            ..RetryPolicy::default()
        }
    }
}

fn parse_backoff_factor(value: &str) -> Result<f64, String> {
    let factor: f64 = value.parse().map_err(|e| format!("{}", e))?;
    if factor.is_finite() && factor >= 0.0 {
        Ok(factor)
    } else {
        Err("must be a non-negative number".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["site-crawler", "https://example.com"]).unwrap();
        assert_eq!(cli.url, "https://example.com");
        assert_eq!(cli.workers.get(), 5);
        assert_eq!(cli.request_timeout(), Duration::from_secs(5));
        assert_eq!(cli.retry_policy(), RetryPolicy::default());
        assert!(!cli.json);
    }

    #[test]
    fn test_all_flags() {
        let cli = Cli::try_parse_from([
            "site-crawler",
            "https://example.com",
            "--workers",
            "12",
            "--timeout",
            "30",
            "--max-retries",
            "0",
            "--backoff-factor",
            "1.5",
            "--json",
        ])
        .unwrap();
        assert_eq!(cli.workers.get(), 12);
        assert_eq!(cli.request_timeout(), Duration::from_secs(30));
        let policy = cli.retry_policy();
        assert_eq!(policy.max_retries, 0);
        assert_eq!(policy.backoff_factor, 1.5);
        assert_eq!(policy.status_forcelist, vec![500, 502, 503, 504]);
        assert!(cli.json);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(Cli::try_parse_from(["site-crawler", "https://example.com", "--workers", "0"]).is_err());
        assert!(
            Cli::try_parse_from(["site-crawler", "https://example.com", "--backoff-factor", "-1"]).is_err()
        );
        assert!(Cli::try_parse_from(["site-crawler"]).is_err());
    }
}
