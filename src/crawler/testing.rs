// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! In-memory engines for crawl tests

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::browser::{
    BrowserVariant, EngineConfig, EngineFactory, EngineKind, Navigation, PageEngine, PageMeta,
    WaitUntil,
};
use crate::error::{Error, Result, VisitError};
use crate::http::BrowserCookie;
use crate::network::ObservedResponse;

/// What the engine shows for one URL
#[derive(Debug, Clone)]
pub struct ScriptedPage {
    pub url: String,
    pub final_url: Option<String>,
    pub status: Option<u16>,
    pub error: Option<VisitError>,
    pub title: String,
    pub meta: Vec<(String, String)>,
    pub links: Vec<String>,
    pub cookies: Vec<BrowserCookie>,
    pub html: String,
    pub responses: Vec<ObservedResponse>,
    /// Only requested once the page is scrolled
    pub lazy_responses: Vec<ObservedResponse>,
}

impl ScriptedPage {
    pub fn ok(url: &str) -> Self {
        Self {
            url: url.to_string(),
            final_url: None,
            status: Some(200),
            error: None,
            title: String::new(),
            meta: Vec::new(),
            links: Vec::new(),
            cookies: Vec::new(),
            html: "<html></html>".to_string(),
            responses: Vec::new(),
            lazy_responses: Vec::new(),
        }
    }

    pub fn failing(url: &str, error: VisitError) -> Self {
        Self {
            error: Some(error),
            status: None,
            ..Self::ok(url)
        }
    }

    pub fn status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn final_url(mut self, url: &str) -> Self {
        self.final_url = Some(url.to_string());
        self
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn meta(mut self, name: &str, content: &str) -> Self {
        self.meta.push((name.to_string(), content.to_string()));
        self
    }

    pub fn link(mut self, href: &str) -> Self {
        self.links.push(href.to_string());
        self
    }

    pub fn cookie(mut self, name: &str, domain: &str) -> Self {
        self.cookies.push(BrowserCookie::new(name, "1").domain(domain));
        self
    }

    pub fn html(mut self, html: &str) -> Self {
        self.html = html.to_string();
        self
    }

    pub fn response(mut self, response: ObservedResponse) -> Self {
        self.responses.push(response);
        self
    }

    pub fn lazy_response(mut self, response: ObservedResponse) -> Self {
        self.lazy_responses.push(response);
        self
    }
}

/// Engine that serves [`ScriptedPage`]s by URL; unknown URLs answer 404
pub struct ScriptedEngine {
    kind: EngineKind,
    pages: HashMap<String, ScriptedPage>,
    current: Option<ScriptedPage>,
    cookies: Vec<BrowserCookie>,
    responses: Vec<ObservedResponse>,
    visits: Arc<Mutex<Vec<String>>>,
    pub scrolls: usize,
}

impl ScriptedEngine {
    pub fn new(pages: Vec<ScriptedPage>) -> Self {
        Self::with_log(EngineKind::Chromium, pages, Arc::new(Mutex::new(Vec::new())))
    }

    fn with_log(kind: EngineKind, pages: Vec<ScriptedPage>, visits: Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            kind,
            pages: pages.into_iter().map(|p| (p.url.clone(), p)).collect(),
            current: None,
            cookies: Vec::new(),
            responses: Vec::new(),
            visits,
            scrolls: 0,
        }
    }

    fn current(&self) -> std::result::Result<&ScriptedPage, VisitError> {
        self.current
            .as_ref()
            .ok_or_else(|| VisitError::unclassified("no page loaded"))
    }
}

#[async_trait]
impl PageEngine for ScriptedEngine {
    fn kind(&self) -> EngineKind {
        self.kind
    }

    async fn navigate(
        &mut self,
        url: &str,
        _wait: WaitUntil,
        _timeout: Duration,
    ) -> std::result::Result<Navigation, VisitError> {
        self.visits.lock().push(url.to_string());
        let page = self
            .pages
            .get(url)
            .cloned()
            .unwrap_or_else(|| ScriptedPage::ok(url).status(404));
        if let Some(error) = page.error.clone() {
            return Err(error);
        }
        self.cookies.extend(page.cookies.iter().cloned());
        self.responses.extend(page.responses.iter().cloned());
        let navigation = Navigation {
            status: page.status,
            final_url: page.final_url.clone().unwrap_or_else(|| url.to_string()),
        };
        self.current = Some(page);
        Ok(navigation)
    }

    async fn current_url(&mut self) -> Option<String> {
        self.current
            .as_ref()
            .map(|p| p.final_url.clone().unwrap_or_else(|| p.url.clone()))
    }

    async fn take_cookies(&mut self) -> std::result::Result<Vec<BrowserCookie>, VisitError> {
        Ok(std::mem::take(&mut self.cookies))
    }

    async fn links(&mut self) -> std::result::Result<Vec<String>, VisitError> {
        Ok(self.current()?.links.clone())
    }

    async fn content(&mut self) -> std::result::Result<String, VisitError> {
        Ok(self.current()?.html.clone())
    }

    async fn metadata(&mut self) -> std::result::Result<PageMeta, VisitError> {
        let page = self.current()?;
        Ok(PageMeta {
            title: page.title.clone(),
            meta: page.meta.clone(),
        })
    }

    async fn click_if_present(&mut self, _selector: &str) -> bool {
        false
    }

    async fn scroll_to_end(&mut self) {
        self.scrolls += 1;
        if let Some(page) = self.current.as_mut() {
            self.responses.append(&mut page.lazy_responses);
        }
    }

    fn take_responses(&mut self) -> Vec<ObservedResponse> {
        std::mem::take(&mut self.responses)
    }

    async fn close(&mut self) {
        self.current = None;
    }
}

/// Opens [`ScriptedEngine`]s; pages can differ per browser variant
#[derive(Default)]
pub struct ScriptedFactory {
    pages: HashMap<(EngineKind, BrowserVariant), Vec<ScriptedPage>>,
    unavailable: Vec<EngineKind>,
    pub visits: Arc<Mutex<Vec<String>>>,
    pub opened: Mutex<Vec<(EngineKind, BrowserVariant)>>,
}

impl ScriptedFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pages for `kind` in both variants
    pub fn pages(self, kind: EngineKind, pages: Vec<ScriptedPage>) -> Self {
        self.variant_pages(kind, BrowserVariant::Chromium, pages.clone())
            .variant_pages(kind, BrowserVariant::Firefox, pages)
    }

    pub fn variant_pages(
        mut self,
        kind: EngineKind,
        variant: BrowserVariant,
        pages: Vec<ScriptedPage>,
    ) -> Self {
        self.pages.insert((kind, variant), pages);
        self
    }

    pub fn unavailable(mut self, kind: EngineKind) -> Self {
        self.unavailable.push(kind);
        self
    }

    pub fn visits(&self) -> Vec<String> {
        self.visits.lock().clone()
    }
}

#[async_trait]
impl EngineFactory for ScriptedFactory {
    async fn open(&self, kind: EngineKind, config: &EngineConfig) -> Result<Box<dyn PageEngine>> {
        if self.unavailable.contains(&kind) {
            return Err(Error::no_browser(format!("{} is not installed", kind)));
        }
        self.opened.lock().push((kind, config.variant));
        let pages = self
            .pages
            .get(&(kind, config.variant))
            .cloned()
            .unwrap_or_default();
        Ok(Box::new(ScriptedEngine::with_log(
            kind,
            pages,
            Arc::clone(&self.visits),
        )))
    }
}
