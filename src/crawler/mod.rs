// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! The crawl: options, collected data, page visits and the visit loop

mod antibot;
mod crawl_loop;
pub mod data;
pub mod email;
mod options;
mod progress;
mod session;
mod sitemap;
#[cfg(test)]
pub(crate) mod testing;
mod visitor;

pub use antibot::is_challenge_page;
pub use crawl_loop::CrawlStatus;
pub use data::{CollectedData, ExternalHost, LinkState, ScriptRecord, TechStack};
pub use email::extract_email_addresses;
pub use options::{CrawlOptions, EngineChoice, RedirectPolicy};
pub use progress::{Progress, ProgressCallback};
pub use session::{run_crawl, Crawler, EngineRun};
pub use sitemap::SITEMAP_PATHS;
pub use visitor::VisitOutcome;
