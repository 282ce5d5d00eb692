// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Engine and persona configuration

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::http::{ACCEPT_LANGUAGE, CHROME_USER_AGENT, FIREFOX_USER_AGENT};

/// A browser engine implementation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    /// Chrome DevTools Protocol
    Chromium,
    /// In-process HTTP browser
    Native,
}

impl EngineKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineKind::Chromium => "chromium",
            EngineKind::Native => "native",
        }
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The browser a crawl pretends to be
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserVariant {
    #[default]
    Chromium,
    Firefox,
}

/// When a navigation counts as finished
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaitUntil {
    #[serde(rename = "domcontentloaded")]
    DomContentLoaded,
    #[serde(rename = "load")]
    Load,
    /// No network activity for 500 ms
    #[serde(rename = "networkidle0")]
    NetworkIdle0,
    /// At most a trickle of network activity for 250 ms
    #[default]
    #[serde(rename = "networkidle2", alias = "networkidle")]
    NetworkIdle2,
}

impl WaitUntil {
    /// Quiet period that counts as network idle
    pub fn idle_window(&self) -> Option<Duration> {
        match self {
            WaitUntil::NetworkIdle0 => Some(Duration::from_millis(500)),
            WaitUntil::NetworkIdle2 => Some(Duration::from_millis(250)),
            WaitUntil::DomContentLoaded | WaitUntil::Load => None,
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Run without a visible window
    pub headless: bool,
    /// Persona
    pub variant: BrowserVariant,
    /// User agent string
    pub user_agent: String,
    /// Accept-Language header value
    pub accept_language: String,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
    /// Accept invalid TLS certificates
    pub ignore_https_errors: bool,
    /// Concurrent subresource fetches (native engine)
    pub subresource_concurrency: usize,
    /// Subresources fetched per page (native engine)
    pub max_subresources: usize,
    /// Default bound for navigations the engine starts itself (clicks)
    pub navigation_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::for_variant(BrowserVariant::Chromium)
    }
}

impl EngineConfig {
    /// Persona preset
    pub fn for_variant(variant: BrowserVariant) -> Self {
        let (user_agent, viewport_width, viewport_height) = match variant {
            BrowserVariant::Chromium => (CHROME_USER_AGENT, 1366, 2000),
            BrowserVariant::Firefox => (FIREFOX_USER_AGENT, 1920, 1080),
        };
        Self {
            headless: true,
            variant,
            user_agent: user_agent.to_string(),
            accept_language: ACCEPT_LANGUAGE.to_string(),
            viewport_width,
            viewport_height,
            ignore_https_errors: true,
            subresource_concurrency: 8,
            max_subresources: 64,
            navigation_timeout: Duration::from_secs(30),
        }
    }

    /// Set headless mode
    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Ignore HTTPS errors
    pub fn ignore_https_errors(mut self, ignore: bool) -> Self {
        self.ignore_https_errors = ignore;
        self
    }

    /// Set the default navigation bound
    pub fn navigation_timeout(mut self, timeout: Duration) -> Self {
        self.navigation_timeout = timeout;
        self
    }
}
