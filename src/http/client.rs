// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP client implementation

use std::time::Duration;

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::redirect::Policy;
use reqwest::{Client, StatusCode};
use url::Url;

use super::cookie::CookieJar;
use super::response::Response;
use super::{headers, ACCEPT_LANGUAGE, CHROME_USER_AGENT};
use crate::error::Result;

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// User agent string
    pub user_agent: String,
    /// Accept-Language header value
    pub accept_language: String,
    /// Default timeout
    pub timeout: Duration,
    /// Maximum redirects to follow; 0 returns the 3xx response itself
    pub max_redirects: usize,
    /// Accept invalid certificates
    pub accept_invalid_certs: bool,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            user_agent: CHROME_USER_AGENT.to_string(),
            accept_language: ACCEPT_LANGUAGE.to_string(),
            timeout: Duration::from_secs(30),
            max_redirects: 10,
            accept_invalid_certs: true,
        }
    }
}

impl HttpClientConfig {
    /// Create a new client config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set user agent
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set Accept-Language
    pub fn accept_language(mut self, accept_language: impl Into<String>) -> Self {
        self.accept_language = accept_language.into();
        self
    }

    /// Set timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Accept invalid certificates
    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Existence checks: no redirects, short timeout
    pub fn for_path_checks() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            max_redirects: 0,
            ..Default::default()
        }
    }
}

/// HTTP client with cookie management
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    cookie_jar: CookieJar,
}

impl HttpClient {
    /// Create a new HTTP client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            headers::ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
            ),
        );
        if let Ok(value) = HeaderValue::from_str(&config.accept_language) {
            default_headers.insert(headers::ACCEPT_LANGUAGE, value);
        }

        // Redirects are followed by hand so each hop's cookies are stored
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(Policy::none())
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .default_headers(default_headers)
            .build()?;

        Ok(Self {
            client,
            config,
            cookie_jar: CookieJar::new(),
        })
    }

    /// Get the cookie jar
    pub fn cookie_jar(&self) -> &CookieJar {
        &self.cookie_jar
    }

    /// GET `url`, following redirects, and read the body
    pub async fn get(&self, url: &Url) -> std::result::Result<Response, reqwest::Error> {
        self.execute(url, true).await
    }

    /// GET `url`, following redirects, without reading the body
    pub async fn check(&self, url: &Url) -> std::result::Result<Response, reqwest::Error> {
        self.execute(url, false).await
    }

    async fn execute(
        &self,
        url: &Url,
        read_body: bool,
    ) -> std::result::Result<Response, reqwest::Error> {
        let mut current = url.clone();
        let mut redirects = 0;

        loop {
            let mut builder = self.client.get(current.clone());
            if let Some(cookie_header) = self.cookie_jar.header_for(&current) {
                builder = builder.header(headers::COOKIE, cookie_header);
            }

            let response = builder.send().await?;
            let status = response.status();
            let response_headers = response.headers().clone();

            for cookie in response_headers.get_all(headers::SET_COOKIE) {
                if let Ok(cookie_str) = cookie.to_str() {
                    self.cookie_jar.add_from_header(cookie_str, &current);
                }
            }

            if let Some(next) = redirect_target(status, &response_headers, &current) {
                if redirects < self.config.max_redirects {
                    redirects += 1;
                    current = next;
                    continue;
                }
            }

            let body = if read_body {
                response.bytes().await?
            } else {
                Bytes::new()
            };

            return Ok(Response::new(status, response_headers, body, current)
                .with_redirects(redirects));
        }
    }
}

/// Location of a 3xx response, resolved against the request URL
fn redirect_target(status: StatusCode, headers: &HeaderMap, base: &Url) -> Option<Url> {
    if !status.is_redirection() {
        return None;
    }
    let location = headers.get(headers::LOCATION)?.to_str().ok()?;
    base.join(location).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_client_creation() {
        let client = HttpClient::new().unwrap();
        assert_eq!(client.config().user_agent, CHROME_USER_AGENT);
        assert_eq!(HttpClientConfig::for_path_checks().max_redirects, 0);
    }

    #[tokio::test]
    async fn test_redirect_cookies_are_kept() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(
                ResponseTemplate::new(302)
                    .insert_header("location", "/home")
                    .insert_header("set-cookie", "sid=abc; Path=/"),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/home"))
            .and(header("cookie", "sid=abc"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>home</html>"))
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let url = Url::parse(&format!("{}/", server.uri())).unwrap();
        let response = client.get(&url).await.unwrap();

        assert_eq!(response.status_code(), 200);
        assert!(response.was_redirected());
        assert_eq!(response.url.path(), "/home");
        assert_eq!(response.text_lossy(), "<html>home</html>");
        assert_eq!(client.cookie_jar().len(), 1);
    }

    #[tokio::test]
    async fn test_check_does_not_follow_redirects() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sitemap.xml"))
            .respond_with(ResponseTemplate::new(301).insert_header("location", "/"))
            .mount(&server)
            .await;

        let client = HttpClient::with_config(HttpClientConfig::for_path_checks()).unwrap();
        let url = Url::parse(&format!("{}/sitemap.xml", server.uri())).unwrap();
        let response = client.check(&url).await.unwrap();

        assert_eq!(response.status_code(), 301);
        assert!(!response.was_redirected());
        assert!(response.body.is_empty());
    }
}
