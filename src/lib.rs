// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! # privacy-crawler - Compliance Website Crawler
//!
//! Crawls a website the way a visitor's browser sees it and reports what a
//! privacy review needs: cookies, third-party hosts, scripts, technologies,
//! legal pages and contact addresses.
//!
//! ## Features
//!
//! - Two engines: Chromium over the DevTools Protocol, or a native HTTP
//!   browser that loads static subresources without running scripts
//! - Dual-engine mode with merged results
//! - Public-suffix aware internal/external classification
//! - CDN host families collapsed into wildcard fingerprints
//! - Analytics cookie names normalized across sessions
//! - Bot-check detection with an engine-switch retry
//! - Sitemap and feed discovery
//!
//! ## Example
//!
//! ```rust,no_run
//! use privacy_crawler::{CrawlOptions, Crawler, EngineChoice};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let options = CrawlOptions::new().engine(EngineChoice::Native).page_limit(5);
//!     let output = Crawler::new(options)?.crawl("https://example.com").await?;
//!
//!     for cookie in &output.results.cookies {
//!         println!("{} ({})", cookie.name, cookie.domain);
//!     }
//!     Ok(())
//! }
//! ```

pub mod browser;
pub mod cookies;
pub mod crawler;
pub mod error;
pub mod fingerprint;
pub mod http;
pub mod network;
pub mod report;
pub mod urls;

// Re-exports for convenience

// Engines
pub use browser::{
    BrowserVariant, ChromiumEngine, DefaultEngineFactory, EngineConfig, EngineFactory, EngineKind,
    NativeEngine, Navigation, PageEngine, PageMeta, WaitUntil,
};

// Crawl
pub use crawler::{
    run_crawl, CollectedData, CrawlOptions, CrawlStatus, Crawler, EngineChoice, Progress,
    ProgressCallback, RedirectPolicy,
};

// Reports
pub use report::{ExternalScript, ExternalUrl, ScrapeOutput, ScrapeReport, WebsiteData};

// Errors
pub use error::{Error, ErrorContext, ErrorKind, Result, VisitError};

// Classification
pub use cookies::{normalize_cookie_name, CookieRecord};
pub use fingerprint::{classify_headers, classify_host};
pub use urls::RootUrl;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
