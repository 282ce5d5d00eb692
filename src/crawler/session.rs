// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Crawl entry point
//!
//! A [`Crawler`] validates its options once, then runs one crawl per
//! engine. Each run owns its [`CollectedData`] and its engine; in
//! dual-engine mode the two runs execute concurrently and are merged after
//! both finished.

use std::sync::Arc;
use std::time::Instant;

use tracing::info;

use super::antibot;
use super::crawl_loop::visit_links;
use super::data::CollectedData;
use super::options::{CrawlOptions, EngineChoice};
use super::progress::ProgressCallback;
use super::sitemap;
use crate::browser::{DefaultEngineFactory, EngineFactory, EngineKind};
use crate::error::Result;
use crate::report::{merge_data, merge_reports, ScrapeOutput, ScrapeReport};
use crate::urls::RootUrl;

/// Data and report of one engine's crawl
#[derive(Debug, Clone)]
pub struct EngineRun {
    pub data: CollectedData,
    pub report: ScrapeReport,
}

/// Crawls sites with a fixed set of options
pub struct Crawler {
    options: CrawlOptions,
    factory: Arc<dyn EngineFactory>,
    progress: Option<ProgressCallback>,
}

impl Crawler {
    /// Crawler with the shipped engines
    pub fn new(options: CrawlOptions) -> Result<Self> {
        Self::with_factory(options, Arc::new(DefaultEngineFactory))
    }

    /// Crawler that opens engines through `factory`
    pub fn with_factory(options: CrawlOptions, factory: Arc<dyn EngineFactory>) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            options,
            factory,
            progress: None,
        })
    }

    /// Receive a [`Progress`](super::Progress) after every visited page
    pub fn on_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    pub fn options(&self) -> &CrawlOptions {
        &self.options
    }

    /// Crawl the site at `url`.
    ///
    /// Page failures end up in the report; only setup failures (invalid
    /// URL, no browser) are returned as errors.
    pub async fn crawl(&self, url: &str) -> Result<ScrapeOutput> {
        let root = RootUrl::parse(url)?;

        let results = match self.options.engine {
            EngineChoice::Chromium => self.run(&root, EngineKind::Chromium).await?.report,
            EngineChoice::Native => self.run(&root, EngineKind::Native).await?.report,
            EngineChoice::Both => {
                let (primary, secondary) = tokio::join!(
                    self.run(&root, EngineKind::Chromium),
                    self.run(&root, EngineKind::Native)
                );
                let (primary, secondary) = (primary?, secondary?);
                let merged = merge_data(&primary.data, &secondary.data);
                merge_reports(
                    &merged,
                    &primary.report,
                    &secondary.report,
                    self.options.privacy_page,
                )
            }
        };

        Ok(ScrapeOutput::new(results))
    }

    /// One complete crawl with one engine
    pub async fn run(&self, root: &RootUrl, kind: EngineKind) -> Result<EngineRun> {
        let started = Instant::now();
        info!("Started ({}): {}", kind, root.href);

        let mut engine = self.factory.open(kind, &self.options.engine_config()).await?;

        let mut data = CollectedData::new(root.clone());
        if self.options.extended_site_paths {
            data.add_extended_site_paths();
        }
        if self.options.sitemap_search || self.options.sitemap_url.is_some() {
            sitemap::discover(engine.as_mut(), &mut data, &self.options).await;
        }

        let progress = self.progress.as_ref();
        let mut status = visit_links(engine.as_mut(), &mut data, &self.options, progress).await;
        engine.close().await;

        if data.anti_bot_detected {
            status = antibot::recover(&mut data, &self.options, self.factory.as_ref(), progress).await;
        }

        let report = ScrapeReport::build(
            &data,
            &status,
            self.options.privacy_page,
            kind.as_str(),
            started.elapsed(),
        );
        info!("Finished ({}) (success: {}): {}", kind, report.success, root.href);

        Ok(EngineRun { data, report })
    }
}

/// Crawl `url` with the shipped engines
pub async fn run_crawl(url: &str, options: CrawlOptions) -> Result<ScrapeOutput> {
    Crawler::new(options)?.crawl(url).await
}
