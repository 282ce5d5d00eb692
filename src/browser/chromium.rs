// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Chromium over the DevTools Protocol

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::{Cookie, EnableParams, EventResponseReceived};
use chromiumoxide::error::CdpError;
use chromiumoxide::Page;
use futures::StreamExt;
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::net_error::classify_message;
use super::{document, EngineConfig, EngineKind, Navigation, PageEngine, PageMeta, WaitUntil};
use crate::error::{Error, VisitError};
use crate::http::BrowserCookie;
use crate::network::{headers_from_json, ObservedResponse, ResourceType};

const SCROLL_ITERATIONS: usize = 10;
const SCROLL_PAUSE: Duration = Duration::from_millis(500);
const CLICK_SETTLE: Duration = Duration::from_secs(2);
const IDLE_POLL: Duration = Duration::from_millis(50);

/// Responses collected by the listener task
type ResponseBuffer = Arc<Mutex<Vec<ObservedResponse>>>;

/// A launched Chromium with one page
pub struct ChromiumEngine {
    browser: Browser,
    page: Option<Page>,
    responses: ResponseBuffer,
    handler_task: JoinHandle<()>,
    listener_task: Option<JoinHandle<()>>,
}

impl ChromiumEngine {
    /// Launch Chromium with the configured persona and open a blank page
    pub async fn launch(config: &EngineConfig) -> crate::error::Result<Self> {
        let mut builder = BrowserConfig::builder()
            .arg("--no-sandbox")
            .arg("--disable-setuid-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg(format!("--user-agent={}", config.user_agent))
            .arg(format!("--lang={}", primary_language(&config.accept_language)))
            .arg(format!("--accept-lang={}", config.accept_language))
            .window_size(config.viewport_width, config.viewport_height);
        if config.ignore_https_errors {
            builder = builder.arg("--ignore-certificate-errors");
        }
        if !config.headless {
            builder = builder.with_head();
        }

        let browser_config = builder
            .build()
            .map_err(|e| Error::no_browser(format!("browser config error: {}", e)))?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| Error::no_browser(format!("browser launch failed: {}", e)))?;

        let handler_task = tokio::spawn(async move { while handler.next().await.is_some() {} });

        let mut engine = Self {
            browser,
            page: None,
            responses: Arc::new(Mutex::new(Vec::new())),
            handler_task,
            listener_task: None,
        };

        if let Err(e) = engine.open_page().await {
            engine.close().await;
            return Err(e);
        }
        Ok(engine)
    }

    async fn open_page(&mut self) -> crate::error::Result<()> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| Error::no_browser(format!("failed to open page: {}", e)))?;
        page.execute(EnableParams::default())
            .await
            .map_err(|e| Error::no_browser(format!("failed to enable network events: {}", e)))?;

        let mut events = page
            .event_listener::<EventResponseReceived>()
            .await
            .map_err(|e| Error::no_browser(format!("failed to listen for responses: {}", e)))?;

        let buffer = Arc::clone(&self.responses);
        self.listener_task = Some(tokio::spawn(async move {
            while let Some(event) = events.next().await {
                let status = u16::try_from(event.response.status).ok();
                let observed = ObservedResponse {
                    url: event.response.url.clone(),
                    status,
                    headers: headers_from_json(event.response.headers.inner()),
                    resource_type: ResourceType::from_cdp(event.r#type.as_ref()),
                };
                buffer.lock().push(observed);
            }
        }));

        self.page = Some(page);
        Ok(())
    }

    fn page(&self) -> Result<&Page, VisitError> {
        self.page
            .as_ref()
            .ok_or_else(|| VisitError::unclassified("browser page is closed"))
    }

    fn buffered(&self) -> usize {
        self.responses.lock().len()
    }

    /// Wait until no response arrived for `window`, giving up at `deadline`
    async fn wait_for_idle(&self, window: Duration, deadline: Instant) {
        let mut seen = self.buffered();
        let mut quiet_since = Instant::now();
        while Instant::now() < deadline {
            tokio::time::sleep(IDLE_POLL).await;
            let now_seen = self.buffered();
            if now_seen != seen {
                seen = now_seen;
                quiet_since = Instant::now();
            } else if quiet_since.elapsed() >= window {
                return;
            }
        }
    }

    /// Status of the first document response at or after `from`
    fn document_status(&self, from: usize) -> Option<u16> {
        self.responses
            .lock()
            .iter()
            .skip(from)
            .find(|r| r.resource_type == ResourceType::Document)
            .and_then(|r| r.status)
    }

    async fn evaluate<T: serde::de::DeserializeOwned>(&self, expression: &str) -> Option<T> {
        let page = self.page().ok()?;
        match page.evaluate(expression).await {
            Ok(result) => result.into_value::<T>().ok(),
            Err(e) => {
                debug!("Evaluation failed: {}", e);
                None
            }
        }
    }
}

/// `de-DE` out of `de-DE,de;q=0.9,..`
fn primary_language(accept_language: &str) -> &str {
    accept_language
        .split(',')
        .next()
        .and_then(|l| l.split(';').next())
        .map(str::trim)
        .unwrap_or("en-US")
}

fn to_browser_cookie(cookie: &Cookie) -> BrowserCookie {
    let converted = BrowserCookie::new(&cookie.name, &cookie.value)
        .domain(&cookie.domain)
        .path(&cookie.path)
        .secure(cookie.secure)
        .http_only(cookie.http_only);
    match cookie_expiry(cookie.expires, cookie.session) {
        Some(expires) => converted.expires(expires),
        None => converted,
    }
}

/// chromiumoxide's own request timeout counts as a navigation timeout
fn navigation_error(err: &CdpError, timeout: Duration) -> VisitError {
    match err {
        CdpError::Timeout => VisitError::timeout(timeout.as_millis() as u64),
        other => classify_message(&other.to_string()),
    }
}

/// DevTools reports expiry in fractional seconds, `-1` for session cookies
fn cookie_expiry(expires: f64, session: bool) -> Option<DateTime<Utc>> {
    if session || expires <= 0.0 {
        return None;
    }
    DateTime::from_timestamp_millis((expires * 1000.0) as i64)
}

#[async_trait]
impl PageEngine for ChromiumEngine {
    fn kind(&self) -> EngineKind {
        EngineKind::Chromium
    }

    async fn navigate(
        &mut self,
        url: &str,
        wait: WaitUntil,
        timeout: Duration,
    ) -> Result<Navigation, VisitError> {
        let deadline = Instant::now() + timeout;
        let start_index = self.buffered();
        let page = self.page()?;

        match tokio::time::timeout(timeout, page.goto(url)).await {
            Err(_) => return Err(VisitError::timeout(timeout.as_millis() as u64)),
            Ok(Err(e)) => return Err(navigation_error(&e, timeout)),
            Ok(Ok(_)) => {}
        }

        if let Some(window) = wait.idle_window() {
            self.wait_for_idle(window, deadline).await;
        }

        let page = self.page()?;
        let final_url = match page.url().await {
            Ok(Some(current)) => current,
            _ => url.to_string(),
        };

        // The listener task may not have drained the event stream yet
        let mut status = self.document_status(start_index);
        if status.is_none() {
            tokio::time::sleep(IDLE_POLL).await;
            status = self.document_status(start_index);
        }

        Ok(Navigation { status, final_url })
    }

    async fn current_url(&mut self) -> Option<String> {
        let page = self.page().ok()?;
        page.url().await.ok().flatten()
    }

    async fn take_cookies(&mut self) -> Result<Vec<BrowserCookie>, VisitError> {
        // Browser-wide: third-party cookies set by subresources are not scoped to the page URL
        let cookies = self
            .browser
            .get_cookies()
            .await
            .map_err(|e| classify_message(&e.to_string()))?;
        if let Err(e) = self.browser.clear_cookies().await {
            warn!("Failed to clear browser cookies: {}", e);
        }
        Ok(cookies.iter().map(to_browser_cookie).collect())
    }

    async fn links(&mut self) -> Result<Vec<String>, VisitError> {
        let html = self.content().await?;
        let base = self
            .current_url()
            .await
            .and_then(|u| url::Url::parse(&u).ok())
            .ok_or_else(|| VisitError::unclassified("page has no URL"))?;
        Ok(document::extract_links(&html, &base))
    }

    async fn content(&mut self) -> Result<String, VisitError> {
        let page = self.page()?;
        page.content()
            .await
            .map_err(|e| classify_message(&e.to_string()))
    }

    async fn metadata(&mut self) -> Result<PageMeta, VisitError> {
        let html = self.content().await?;
        let mut meta = document::extract_meta(&html);
        if let Ok(Some(title)) = self.page()?.get_title().await {
            meta.title = title;
        }
        Ok(meta)
    }

    async fn click_if_present(&mut self, selector: &str) -> bool {
        let Ok(page) = self.page() else {
            return false;
        };
        let element = match page.find_element(selector).await {
            Ok(element) => element,
            Err(_) => return false,
        };
        if let Err(e) = element.click().await {
            debug!("Click on {} failed: {}", selector, e);
            return false;
        }
        tokio::time::sleep(CLICK_SETTLE).await;
        true
    }

    async fn scroll_to_end(&mut self) {
        let mut last_height: Option<f64> = None;
        for _ in 0..SCROLL_ITERATIONS {
            let Some(height) = self.evaluate::<f64>("document.body.scrollHeight").await else {
                return;
            };
            if last_height == Some(height) {
                return;
            }
            last_height = Some(height);
            let _ = self
                .evaluate::<serde_json::Value>("window.scrollTo(0, document.body.scrollHeight)")
                .await;
            tokio::time::sleep(SCROLL_PAUSE).await;
        }
    }

    fn take_responses(&mut self) -> Vec<ObservedResponse> {
        std::mem::take(&mut *self.responses.lock())
    }

    async fn close(&mut self) {
        if let Some(task) = self.listener_task.take() {
            task.abort();
        }
        if let Some(page) = self.page.take() {
            if let Err(e) = page.close().await {
                warn!("Failed to close page: {}", e);
            }
        }
        if let Err(e) = self.browser.close().await {
            warn!("Failed to close browser: {}", e);
        }
        if let Err(e) = self.browser.wait().await {
            debug!("Browser process did not exit cleanly: {}", e);
        }
        self.handler_task.abort();
    }
}
