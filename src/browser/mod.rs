// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Browser engines
//!
//! The crawl loop drives one [`PageEngine`] at a time and never looks
//! behind it. Two engines ship:
//! - [`ChromiumEngine`]: a real Chromium over the DevTools Protocol
//! - [`NativeEngine`]: an in-process HTTP browser that fetches the document
//!   and its static subresources without running scripts

mod chromium;
mod config;
pub mod document;
mod native;
pub mod net_error;

use std::time::Duration;

use async_trait::async_trait;

pub use chromium::ChromiumEngine;
pub use config::{BrowserVariant, EngineConfig, EngineKind, WaitUntil};
pub use native::NativeEngine;

use crate::error::{ErrorContext, Result, VisitError};
use crate::http::BrowserCookie;
use crate::network::ObservedResponse;

/// Outcome of a successful navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    /// Status of the main document response, when one was seen
    pub status: Option<u16>,
    /// URL after redirects
    pub final_url: String,
}

/// Title and named meta tags of the current page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMeta {
    pub title: String,
    /// `meta[name]` name/content pairs in document order
    pub meta: Vec<(String, String)>,
}

impl PageMeta {
    /// Content of the first meta tag called `name` (case-insensitive)
    pub fn content_of(&self, name: &str) -> Option<&str> {
        self.meta
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, content)| content.as_str())
    }
}

/// One open browser page
#[async_trait]
pub trait PageEngine: Send {
    fn kind(&self) -> EngineKind;

    /// Navigate and wait for `wait`, bounded by `timeout`
    async fn navigate(
        &mut self,
        url: &str,
        wait: WaitUntil,
        timeout: Duration,
    ) -> std::result::Result<Navigation, VisitError>;

    /// URL of the current page
    async fn current_url(&mut self) -> Option<String>;

    /// All cookies the browser holds; the jar is empty afterwards
    async fn take_cookies(&mut self) -> std::result::Result<Vec<BrowserCookie>, VisitError>;

    /// Absolute anchor hrefs of the current page
    async fn links(&mut self) -> std::result::Result<Vec<String>, VisitError>;

    /// Rendered HTML of the current page
    async fn content(&mut self) -> std::result::Result<String, VisitError>;

    async fn metadata(&mut self) -> std::result::Result<PageMeta, VisitError>;

    /// Click the first element matching `selector`; false when there is none
    async fn click_if_present(&mut self, selector: &str) -> bool;

    /// Scroll until the page stops growing
    async fn scroll_to_end(&mut self);

    /// Responses seen since the last call, header names lower-cased
    fn take_responses(&mut self) -> Vec<ObservedResponse>;

    /// Tear down; errors are logged, not returned
    async fn close(&mut self);
}

/// Opens engines for a crawl
#[async_trait]
pub trait EngineFactory: Send + Sync {
    async fn open(&self, kind: EngineKind, config: &EngineConfig) -> Result<Box<dyn PageEngine>>;
}

/// Opens the shipped engines
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultEngineFactory;

#[async_trait]
impl EngineFactory for DefaultEngineFactory {
    async fn open(&self, kind: EngineKind, config: &EngineConfig) -> Result<Box<dyn PageEngine>> {
        match kind {
            EngineKind::Chromium => Ok(Box::new(
                ChromiumEngine::launch(config).await.context("chromium")?,
            )),
            EngineKind::Native => Ok(Box::new(NativeEngine::new(config).context("native")?)),
        }
    }
}
