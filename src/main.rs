// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Set up logging (tracing, filtered by RUST_LOG, printed to stderr)
// 2. Parse command-line arguments using clap
// 3. Build the HTTP fetcher (with retries) and the crawl session
// 4. Run the crawl and print the report
// 5. Exit with proper code (0 = crawl finished, 2 = could not start)
//
// Failed pages don't change the exit code: the crawl always finishes and
// reports what it found.
// =============================================================================

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use site_crawler::crawl::{CrawlReport, CrawlSession};
use site_crawler::fetch::{HttpFetcher, Retrying};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// The #[tokio::main] attribute transforms our async main into a real main function
// It creates a tokio runtime and runs our async code inside it
#[tokio::main]
async fn main() {
    // Logs go to stderr so stdout only carries the report (and stays valid JSON)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let exit_code = match run().await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let http = HttpFetcher::new(cli.request_timeout()).context("Failed to create HTTP client")?;
    let fetcher = Retrying::new(http, cli.retry_policy());

    let session = CrawlSession::new(&cli.url, cli.workers, fetcher)?;

    tracing::info!(
        url = %session.start_url(),
        workers = session.max_workers().get(),
        "starting crawl"
    );

    let report = session.start().await;

    print_report(&report, cli.json)
}

// Prints the report either as text or JSON
fn print_report(report: &CrawlReport, json: bool) -> Result<()> {
    if json {
        let json_output = serde_json::to_string_pretty(report)?;
        println!("{}", json_output);
        return Ok(());
    }

    println!("🔍 Crawled: {}", report.start_url);
    println!("📄 Pages visited: {}", report.pages_visited);
    println!("🔗 Total number of unique new links found: {}", report.new_links);

    if !report.failures.is_empty() {
        println!("\n❌ {} page(s) could not be fetched:", report.failures.len());
        for failure in &report.failures {
            println!("   {} ({})", failure.url, failure.error);
        }
    }

    println!("\n⏱️  Elapsed time: {:.2}s", report.elapsed_secs);
    Ok(())
}
