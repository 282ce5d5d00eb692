// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! In-process HTTP browser
//!
//! Loads the document, then the static subresources a browser would fetch
//! (scripts, stylesheets, preloads, images, iframes) so third-party hosts
//! and the cookies they set are observed. Scripts are not run.

use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use tracing::debug;
use url::Url;

use super::net_error::classify_transport_error;
use super::{document, EngineConfig, EngineKind, Navigation, PageEngine, PageMeta, WaitUntil};
use crate::error::{Error, VisitError};
use crate::http::{BrowserCookie, HttpClient, HttpClientConfig};
use crate::network::{ObservedResponse, ResourceType};

/// The document currently shown
#[derive(Debug, Clone)]
struct LoadedPage {
    url: Url,
    html: String,
}

/// HTTP-only page engine
pub struct NativeEngine {
    client: HttpClient,
    config: EngineConfig,
    page: Option<LoadedPage>,
    responses: Vec<ObservedResponse>,
    last_wait: WaitUntil,
}

impl NativeEngine {
    pub fn new(config: &EngineConfig) -> crate::error::Result<Self> {
        let client_config = HttpClientConfig::new()
            .user_agent(&config.user_agent)
            .accept_language(&config.accept_language)
            .timeout(config.navigation_timeout)
            .accept_invalid_certs(config.ignore_https_errors);
        let client = HttpClient::with_config(client_config)
            .map_err(|e| Error::no_browser(e.to_string()))?;

        Ok(Self {
            client,
            config: config.clone(),
            page: None,
            responses: Vec::new(),
            last_wait: WaitUntil::default(),
        })
    }

    async fn load(&mut self, url: Url, wait: WaitUntil) -> Result<Navigation, VisitError> {
        let response = self
            .client
            .get(&url)
            .await
            .map_err(|e| classify_transport_error(&e))?;

        let status = response.status_code();
        let final_url = response.url.clone();
        let html = response.text_lossy();

        let mut observed = ObservedResponse::new(final_url.as_str(), ResourceType::Document)
            .with_status(status);
        observed.headers = response.observed_headers();
        self.responses.push(observed);

        if wait != WaitUntil::DomContentLoaded && response.is_html() {
            self.fetch_subresources(&html, &final_url).await;
        }

        self.page = Some(LoadedPage {
            url: final_url.clone(),
            html,
        });

        Ok(Navigation {
            status: Some(status),
            final_url: final_url.to_string(),
        })
    }

    async fn fetch_subresources(&mut self, html: &str, base: &Url) {
        let mut targets = document::subresource_urls(html, base);
        targets.truncate(self.config.max_subresources);

        let client = &self.client;
        let fetched: Vec<ObservedResponse> = stream::iter(targets)
            .map(|(url, resource_type)| async move {
                match client.check(&url).await {
                    Ok(response) => {
                        let mut observed =
                            ObservedResponse::new(response.url.as_str(), resource_type)
                                .with_status(response.status_code());
                        observed.headers = response.observed_headers();
                        Some(observed)
                    }
                    Err(e) => {
                        debug!("Subresource {} failed: {}", url, e);
                        None
                    }
                }
            })
            .buffer_unordered(self.config.subresource_concurrency.max(1))
            .filter_map(|observed| async move { observed })
            .collect()
            .await;

        self.responses.extend(fetched);
    }

    fn current_page(&self) -> Result<&LoadedPage, VisitError> {
        self.page
            .as_ref()
            .ok_or_else(|| VisitError::unclassified("no page loaded"))
    }
}

#[async_trait]
impl PageEngine for NativeEngine {
    fn kind(&self) -> EngineKind {
        EngineKind::Native
    }

    async fn navigate(
        &mut self,
        url: &str,
        wait: WaitUntil,
        timeout: Duration,
    ) -> Result<Navigation, VisitError> {
        let target = Url::parse(url)
            .map_err(|e| VisitError::unclassified(format!("invalid URL {}: {}", url, e)))?;
        self.last_wait = wait;

        match tokio::time::timeout(timeout, self.load(target, wait)).await {
            Ok(result) => result,
            Err(_) => Err(VisitError::timeout(timeout.as_millis() as u64)),
        }
    }

    async fn current_url(&mut self) -> Option<String> {
        self.page.as_ref().map(|p| p.url.to_string())
    }

    async fn take_cookies(&mut self) -> Result<Vec<BrowserCookie>, VisitError> {
        Ok(self.client.cookie_jar().drain())
    }

    async fn links(&mut self) -> Result<Vec<String>, VisitError> {
        let page = self.current_page()?;
        Ok(document::extract_links(&page.html, &page.url))
    }

    async fn content(&mut self) -> Result<String, VisitError> {
        Ok(self.current_page()?.html.clone())
    }

    async fn metadata(&mut self) -> Result<PageMeta, VisitError> {
        Ok(document::extract_meta(&self.current_page()?.html))
    }

    /// Follows the element's `href`; elements without one count as absent
    async fn click_if_present(&mut self, selector: &str) -> bool {
        let target = match self.page.as_ref() {
            Some(page) => document::element_href(&page.html, selector, &page.url),
            None => None,
        };
        let Some(target) = target else {
            return false;
        };

        let wait = self.last_wait;
        let timeout = self.config.navigation_timeout;
        match self.navigate(target.as_str(), wait, timeout).await {
            Ok(_) => true,
            Err(e) => {
                debug!("Click navigation to {} failed: {}", target, e);
                false
            }
        }
    }

    async fn scroll_to_end(&mut self) {}

    fn take_responses(&mut self) -> Vec<ObservedResponse> {
        std::mem::take(&mut self.responses)
    }

    async fn close(&mut self) {
        self.page = None;
        self.responses.clear();
        self.client.cookie_jar().drain();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn html_page(body: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_raw(body.to_string(), "text/html")
    }

    async fn site() -> MockServer {
        let server = MockServer::start().await;
        let page = format!(
            r#"<html><head><title>Home</title>
               <script src="{0}/static/app.js"></script>
               <link rel="stylesheet" href="/static/site.css">
               </head><body>
               <a href="/impressum">Impressum</a>
               <a id="more" href="/more">More</a>
               </body></html>"#,
            server.uri()
        );
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(
                html_page(&page)
                    .insert_header("server", "nginx/1.25")
                    .insert_header("set-cookie", "sid=1; Path=/; HttpOnly"),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/static/app.js"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("set-cookie", "_ga=GA1.1.1; Max-Age=3600")
                    .set_body_string("console.log(1)"),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/static/site.css"))
            .respond_with(ResponseTemplate::new(200).set_body_string("body{}"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/more"))
            .respond_with(html_page("<html><body>more</body></html>"))
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn test_navigate_records_document_and_subresources() {
        let server = site().await;
        let mut engine = NativeEngine::new(&EngineConfig::default()).unwrap();

        let nav = engine
            .navigate(&format!("{}/", server.uri()), WaitUntil::Load, Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(nav.status, Some(200));

        let responses = engine.take_responses();
        assert_eq!(responses.len(), 3);
        assert_eq!(responses[0].resource_type, ResourceType::Document);
        assert_eq!(responses[0].header("server"), Some("nginx/1.25"));
        assert!(responses.iter().any(|r| r.resource_type == ResourceType::Script));
        assert!(engine.take_responses().is_empty());

        let mut cookies: Vec<_> = engine
            .take_cookies()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        cookies.sort();
        assert_eq!(cookies, vec!["_ga", "sid"]);
        assert!(engine.take_cookies().await.unwrap().is_empty());

        let links = engine.links().await.unwrap();
        assert!(links.contains(&format!("{}/impressum", server.uri())));
        assert_eq!(engine.metadata().await.unwrap().title, "Home");
    }

    #[tokio::test]
    async fn test_domcontentloaded_skips_subresources() {
        let server = site().await;
        let mut engine = NativeEngine::new(&EngineConfig::default()).unwrap();
        engine
            .navigate(
                &format!("{}/", server.uri()),
                WaitUntil::DomContentLoaded,
                Duration::from_secs(5),
            )
            .await
            .unwrap();
        assert_eq!(engine.take_responses().len(), 1);
    }

    #[tokio::test]
    async fn test_click_follows_href() {
        let server = site().await;
        let mut engine = NativeEngine::new(&EngineConfig::default()).unwrap();
        engine
            .navigate(&format!("{}/", server.uri()), WaitUntil::Load, Duration::from_secs(5))
            .await
            .unwrap();

        assert!(!engine.click_if_present("#missing").await);
        assert!(engine.click_if_present("#more").await);
        assert_eq!(engine.current_url().await, Some(format!("{}/more", server.uri())));
    }

    #[tokio::test]
    async fn test_navigation_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(html_page("slow").set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;

        let mut engine = NativeEngine::new(&EngineConfig::default()).unwrap();
        let err = engine
            .navigate(&server.uri(), WaitUntil::Load, Duration::from_millis(200))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Timeout);
        assert_eq!(err.message, "Navigation timeout of 200 ms exceeded");
    }

    #[tokio::test]
    async fn test_error_status_is_not_a_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("gone"))
            .mount(&server)
            .await;

        let mut engine = NativeEngine::new(&EngineConfig::default()).unwrap();
        let nav = engine
            .navigate(&server.uri(), WaitUntil::Load, Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(nav.status, Some(404));
    }
}
