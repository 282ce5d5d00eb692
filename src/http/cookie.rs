// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Browser cookies and the native engine's cookie jar

use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use url::Url;

/// Date layouts seen in `Expires` besides RFC 2822
const EXPIRES_LAYOUTS: [&str; 3] = [
    "%a, %d-%b-%Y %H:%M:%S GMT",
    "%a, %d %b %Y %H:%M:%S GMT",
    "%A, %d-%b-%y %H:%M:%S GMT",
];

/// A cookie as the browser stores it, before name normalization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrowserCookie {
    pub name: String,
    pub value: String,
    /// As set by the site; a leading `.` marks a domain cookie
    pub domain: String,
    pub path: String,
    /// `None` for session cookies
    pub expires: Option<DateTime<Utc>>,
    pub secure: bool,
    pub http_only: bool,
}

impl BrowserCookie {
    /// Session cookie for `/` without a domain
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: String::new(),
            path: String::from("/"),
            expires: None,
            secure: false,
            http_only: false,
        }
    }

    pub fn domain(self, domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            ..self
        }
    }

    pub fn path(self, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..self
        }
    }

    pub fn secure(self, secure: bool) -> Self {
        Self { secure, ..self }
    }

    pub fn http_only(self, http_only: bool) -> Self {
        Self { http_only, ..self }
    }

    pub fn expires(self, at: DateTime<Utc>) -> Self {
        Self {
            expires: Some(at),
            ..self
        }
    }

    pub fn is_session(&self) -> bool {
        self.expires.is_none()
    }

    pub fn is_expired(&self) -> bool {
        matches!(self.expires, Some(at) if at < Utc::now())
    }

    /// Whether a request to `url` carries this cookie
    pub fn matches(&self, url: &Url) -> bool {
        let host = url.host_str().unwrap_or_default();
        let secure_ok = !self.secure || url.scheme() == "https";
        self.sent_to_host(host) && url.path().starts_with(&self.path) && secure_ok && !self.is_expired()
    }

    fn sent_to_host(&self, host: &str) -> bool {
        let scope = self.domain.trim_start_matches('.');
        if scope.is_empty() || host == scope {
            return true;
        }
        host.strip_suffix(scope)
            .map_or(false, |prefix| prefix.ends_with('.'))
    }

    /// Cookie from a `Set-Cookie` value received from `url`.
    ///
    /// Without a `Domain` attribute the cookie is host-only. `Max-Age`
    /// takes precedence over `Expires`.
    pub fn parse(header: &str, url: &Url) -> Option<Self> {
        let mut attributes = header.split(';').map(str::trim);
        let (name, value) = attributes.next()?.split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let mut cookie = Self::new(name, value.trim()).domain(url.host_str().unwrap_or_default());
        let mut lifetime: Option<i64> = None;

        for attribute in attributes {
            let (key, val) = match attribute.split_once('=') {
                Some((key, val)) => (key.trim().to_ascii_lowercase(), Some(val.trim())),
                None => (attribute.to_ascii_lowercase(), None),
            };
            match (key.as_str(), val) {
                ("secure", None) => cookie.secure = true,
                ("httponly", None) => cookie.http_only = true,
                ("domain", Some(scope)) if !scope.is_empty() => {
                    cookie.domain = format!(".{}", scope.trim_start_matches('.'));
                }
                ("path", Some(path)) => cookie.path = path.to_string(),
                ("expires", Some(date)) => {
                    if let Some(at) = parse_expires(date) {
                        cookie.expires = Some(at);
                    }
                }
                ("max-age", Some(secs)) => lifetime = secs.parse().ok(),
                _ => {}
            }
        }

        if let Some(secs) = lifetime {
            cookie.expires = Some(Utc::now() + Duration::seconds(secs));
        }
        Some(cookie)
    }

    /// `name=value` for a `Cookie` request header
    pub fn to_header_value(&self) -> String {
        format!("{}={}", self.name, self.value)
    }
}

fn parse_expires(date: &str) -> Option<DateTime<Utc>> {
    if let Ok(at) = DateTime::parse_from_rfc2822(date) {
        return Some(at.with_timezone(&Utc));
    }
    EXPIRES_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(date, layout).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Identity of a stored cookie; a later cookie with the same key replaces it
type CookieKey = (String, String, String);

/// Cookies the native engine received, shared by clones of its client
#[derive(Debug, Clone, Default)]
pub struct CookieJar {
    store: Arc<DashMap<CookieKey, BrowserCookie>>,
}

impl CookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, cookie: BrowserCookie) {
        let key = (cookie.domain.clone(), cookie.path.clone(), cookie.name.clone());
        self.store.insert(key, cookie);
    }

    /// Store the cookie of one `Set-Cookie` header, ignoring malformed ones
    pub fn add_from_header(&self, header: &str, url: &Url) {
        if let Some(cookie) = BrowserCookie::parse(header, url) {
            self.add(cookie);
        }
    }

    /// `Cookie` header for a request to `url`, if any cookie applies
    pub fn header_for(&self, url: &Url) -> Option<String> {
        let pairs: Vec<String> = self
            .store
            .iter()
            .filter(|entry| entry.value().matches(url))
            .map(|entry| entry.value().to_header_value())
            .collect();
        (!pairs.is_empty()).then(|| pairs.join("; "))
    }

    /// Snapshot ordered by domain, then name
    pub fn all(&self) -> Vec<BrowserCookie> {
        let mut cookies: Vec<BrowserCookie> =
            self.store.iter().map(|entry| entry.value().clone()).collect();
        cookies.sort_by(|a, b| a.domain.cmp(&b.domain).then_with(|| a.name.cmp(&b.name)));
        cookies
    }

    /// Like [`all`](Self::all), leaving the jar empty
    pub fn drain(&self) -> Vec<BrowserCookie> {
        let cookies = self.all();
        self.store.clear();
        cookies
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_domain_cookie() {
        let url = Url::parse("https://example.com/path").unwrap();
        let cookie = BrowserCookie::parse(
            "session=abc123; Domain=example.com; Path=/; Secure; HttpOnly",
            &url,
        )
        .unwrap();

        assert_eq!(cookie.name, "session");
        assert_eq!(cookie.value, "abc123");
        assert_eq!(cookie.domain, ".example.com");
        assert_eq!(cookie.path, "/");
        assert!(cookie.secure && cookie.http_only);
        assert!(cookie.is_session());
    }

    #[test]
    fn test_host_only_cookie_and_expiry() {
        let url = Url::parse("https://shop.example.com/").unwrap();
        let cookie =
            BrowserCookie::parse("_ga=GA1.2.3; Expires=Wed, 21-Oct-2099 07:28:00 GMT", &url).unwrap();
        assert_eq!(cookie.domain, "shop.example.com");
        assert!(!cookie.is_session());
        assert!(!cookie.is_expired());

        let cookie =
            BrowserCookie::parse("id=1; Expires=Wed, 21-Oct-2099 07:28:00 GMT; Max-Age=3600", &url).unwrap();
        let minutes = (cookie.expires.unwrap() - Utc::now()).num_minutes();
        assert!((58..=60).contains(&minutes));

        assert!(BrowserCookie::parse("novalue", &url).is_none());
        assert!(BrowserCookie::parse("=abc", &url).is_none());
    }

    #[test]
    fn test_domain_scope() {
        let cookie = BrowserCookie::new("a", "1").domain(".example.com");
        assert!(cookie.matches(&Url::parse("https://www.example.com/").unwrap()));
        assert!(cookie.matches(&Url::parse("https://example.com/").unwrap()));
        assert!(!cookie.matches(&Url::parse("https://badexample.com/").unwrap()));

        let secure = BrowserCookie::new("b", "1").domain("example.com").secure(true);
        assert!(!secure.matches(&Url::parse("http://example.com/").unwrap()));
    }

    #[test]
    fn test_cookie_jar() {
        let jar = CookieJar::new();
        let url = Url::parse("https://example.com/path").unwrap();

        jar.add(BrowserCookie::new("test", "value").domain("example.com"));
        jar.add(BrowserCookie::new("test", "newer").domain("example.com"));
        assert_eq!(jar.len(), 1);
        assert_eq!(jar.header_for(&url).as_deref(), Some("test=newer"));

        let drained = jar.drain();
        assert_eq!(drained.len(), 1);
        assert!(jar.is_empty());
        assert_eq!(jar.header_for(&url), None);
    }
}
