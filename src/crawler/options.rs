// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Crawl options
//!
//! Every default lives in [`CrawlOptions::default`]; [`CrawlOptions::validate`]
//! runs once at crawl entry.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::browser::{BrowserVariant, EngineConfig, EngineKind, WaitUntil};
use crate::error::{Error, Result};
use crate::urls;

/// Which engine(s) a crawl runs with
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineChoice {
    #[default]
    Chromium,
    Native,
    /// Both engines, results merged
    Both,
}

/// How a redirect off the visited link's host is judged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RedirectPolicy {
    /// Different registrable domain
    Domain,
    /// Different registrable domain or subdomain
    Subdomain,
}

/// Options of one crawl
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CrawlOptions {
    pub engine: EngineChoice,
    pub browser: BrowserVariant,
    /// Maximum pages visited
    pub page_limit: u32,
    /// Progress lines at info level instead of debug
    pub log: bool,
    /// Collect email addresses from page HTML
    pub emails: bool,
    pub wait_until: WaitUntil,
    pub headless: bool,
    /// Report privacy/legal pages
    pub privacy_page: bool,
    /// Check well-known sitemap paths before crawling
    pub sitemap_search: bool,
    pub sitemap_url: Option<String>,
    /// Pause after each visit, in milliseconds
    pub delay: u64,
    pub redirect_error: Option<RedirectPolicy>,
    /// Scroll to the bottom of every page
    pub scroll: bool,
    /// Seed administrative path guesses
    pub extended_site_paths: bool,
    /// CSS selector clicked once on the first page
    pub click_element: Option<String>,
    /// Engine used to retry after a bot-check page
    pub fallback_engine: EngineKind,
    pub navigation_timeout_ms: u64,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            engine: EngineChoice::Chromium,
            browser: BrowserVariant::Chromium,
            page_limit: 3,
            log: false,
            emails: false,
            wait_until: WaitUntil::NetworkIdle2,
            headless: true,
            privacy_page: true,
            sitemap_search: false,
            sitemap_url: None,
            delay: 300,
            redirect_error: None,
            scroll: false,
            extended_site_paths: false,
            click_element: None,
            fallback_engine: EngineKind::Chromium,
            navigation_timeout_ms: 30_000,
        }
    }
}

impl CrawlOptions {
    /// Create options with every default
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON options object; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set engine
    pub fn engine(mut self, engine: EngineChoice) -> Self {
        self.engine = engine;
        self
    }

    /// Set browser persona
    pub fn browser(mut self, browser: BrowserVariant) -> Self {
        self.browser = browser;
        self
    }

    /// Set page limit
    pub fn page_limit(mut self, limit: u32) -> Self {
        self.page_limit = limit;
        self
    }

    /// Collect email addresses
    pub fn emails(mut self, emails: bool) -> Self {
        self.emails = emails;
        self
    }

    /// Set wait condition
    pub fn wait_until(mut self, wait_until: WaitUntil) -> Self {
        self.wait_until = wait_until;
        self
    }

    /// Set post-visit delay in milliseconds
    pub fn delay(mut self, delay_ms: u64) -> Self {
        self.delay = delay_ms;
        self
    }

    /// Scroll each page to the bottom before collecting
    pub fn scroll(mut self, scroll: bool) -> Self {
        self.scroll = scroll;
        self
    }

    /// Set redirect policy
    pub fn redirect_error(mut self, policy: Option<RedirectPolicy>) -> Self {
        self.redirect_error = policy;
        self
    }

    /// Enable sitemap path probing
    pub fn sitemap_search(mut self, enabled: bool) -> Self {
        self.sitemap_search = enabled;
        self
    }

    /// Set an explicit sitemap URL
    pub fn sitemap_url(mut self, url: impl Into<String>) -> Self {
        self.sitemap_url = Some(url.into());
        self
    }

    /// Seed administrative paths
    pub fn extended_site_paths(mut self, enabled: bool) -> Self {
        self.extended_site_paths = enabled;
        self
    }

    /// Click `selector` on the first page
    pub fn click_element(mut self, selector: impl Into<String>) -> Self {
        self.click_element = Some(selector.into());
        self
    }

    /// Set fallback engine
    pub fn fallback_engine(mut self, engine: EngineKind) -> Self {
        self.fallback_engine = engine;
        self
    }

    /// Check every option once, before any engine is opened
    pub fn validate(&self) -> Result<()> {
        if self.page_limit < 1 {
            return Err(Error::config("pageLimit must be at least 1"));
        }
        if self.navigation_timeout_ms == 0 {
            return Err(Error::config("navigationTimeoutMs must be positive"));
        }
        if let Some(url) = &self.sitemap_url {
            if !urls::is_valid_url(url) {
                return Err(Error::config(format!(
                    "sitemapUrl must be an absolute http(s) URL: {}",
                    url
                )));
            }
        }
        if let Some(selector) = &self.click_element {
            if selector.trim().is_empty() {
                return Err(Error::config("clickElement must not be empty"));
            }
            if scraper::Selector::parse(selector).is_err() {
                return Err(Error::config(format!("clickElement is not a CSS selector: {}", selector)));
            }
        }
        Ok(())
    }

    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }

    pub fn delay_duration(&self) -> Duration {
        Duration::from_millis(self.delay)
    }

    /// Persona for the primary engine(s)
    pub fn engine_config(&self) -> EngineConfig {
        self.engine_config_for(self.browser)
    }

    /// Persona for a specific variant
    pub fn engine_config_for(&self, variant: BrowserVariant) -> EngineConfig {
        EngineConfig::for_variant(variant)
            .headless(self.headless)
            .navigation_timeout(self.navigation_timeout())
    }
}
