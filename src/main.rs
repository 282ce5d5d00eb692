// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! privacy-crawler CLI
//!
//! Prints the crawl output as JSON on stdout; logs go to stderr.

use std::env;
use std::process::ExitCode;

use anyhow::Context;
use serde::Deserialize;
use tracing::error;

use privacy_crawler::{CrawlOptions, Crawler};

/// `--json` request body
#[derive(Debug, Deserialize)]
struct CrawlRequest {
    url: String,
    #[serde(default)]
    options: CrawlOptions,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("privacy_crawler=info")),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    let request = match args.get(1).map(String::as_str) {
        None => {
            print_usage();
            return ExitCode::from(1);
        }
        Some("--help" | "-h" | "help") => {
            print_usage();
            return ExitCode::SUCCESS;
        }
        Some("--version" | "-v" | "version") => {
            println!("privacy-crawler {}", privacy_crawler::VERSION);
            return ExitCode::SUCCESS;
        }
        Some("--json") => match args.get(2) {
            Some(body) => parse_request(body),
            None => Err(anyhow::anyhow!("--json needs a request body")),
        },
        Some(url) => parse_options(args.get(2).map(String::as_str)).map(|options| CrawlRequest {
            url: url.to_string(),
            options,
        }),
    };

    let result = match request {
        Ok(request) => crawl(request).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            let setup = e
                .downcast_ref::<privacy_crawler::Error>()
                .map_or(false, privacy_crawler::Error::is_setup_failure);
            if setup {
                error!("Crawl not started: {:#}", e);
            } else {
                error!("Crawl failed: {:#}", e);
            }
            println!("{}", serde_json::json!({ "error": format!("{:#}", e) }));
            ExitCode::from(1)
        }
    }
}

fn parse_request(body: &str) -> anyhow::Result<CrawlRequest> {
    serde_json::from_str(body).context("invalid request JSON")
}

fn parse_options(raw: Option<&str>) -> anyhow::Result<CrawlOptions> {
    match raw {
        Some(json) => CrawlOptions::from_json(json).context("invalid options JSON"),
        None => Ok(CrawlOptions::default()),
    }
}

async fn crawl(request: CrawlRequest) -> anyhow::Result<String> {
    let output = Crawler::new(request.options)?.crawl(&request.url).await?;
    Ok(serde_json::to_string_pretty(&output)?)
}

fn print_usage() {
    println!(
        r#"privacy-crawler - Compliance Website Crawler

USAGE:
    privacy-crawler <url> [options-json]
    privacy-crawler --json '{{"url": "...", "options": {{...}}}}'

OPTIONS (JSON, all optional):
    engine              "chromium" | "native" | "both"     (default "chromium")
    browser             "chromium" | "firefox"             (default "chromium")
    pageLimit           pages to visit                     (default 3)
    waitUntil           "domcontentloaded" | "load" | "networkidle0" | "networkidle2"
    redirectError       "domain" | "subdomain" | null
    delay               pause after each page in ms        (default 300)
    emails, scroll, sitemapSearch, extendedSitePaths, headless, privacyPage, log
    sitemapUrl, clickElement, fallbackEngine, navigationTimeoutMs

    RUST_LOG controls log output (default "privacy_crawler=info").

EXAMPLES:
    privacy-crawler https://example.com
    privacy-crawler example.com '{{"engine": "both", "pageLimit": 10}}'
"#
    );
}
