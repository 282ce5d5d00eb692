// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! URL normalization and internal/external classification
//!
//! Domain comparison is public-suffix aware: `shop.example.co.uk` and
//! `example.co.uk` share the registrable domain `example.co.uk`. Hosts the
//! public suffix list does not know (IP addresses, `localhost`, unlisted
//! TLDs) only match themselves.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};

/// Path extensions that never point at an HTML page
pub const INVALID_EXTENSIONS: [&str; 42] = [
    ".pdf", ".vcf", ".zip", ".ics", ".jpg", ".jpeg", ".webp", ".avif", ".doc", ".docx", ".xls",
    ".ico", ".xlsx", ".ppt", ".jfif", ".pptx", ".txt", ".rtf", ".png", ".gif", ".bmp", ".tiff",
    ".mp3", ".wav", ".aac", ".svg", ".mp4", ".mov", ".wmv", ".rar", ".7z", ".exe", ".dll", ".sys",
    ".json", ".xml", ".csv", ".js", ".css", ".py", ".gz", ".asc",
];

/// Administrative paths seeded when extended site paths are enabled
pub const EXTENDED_SITE_PATHS: [&str; 14] = [
    "/wp-login",
    "/wp-admin",
    "/administrator",
    "/user/login",
    "/user",
    "/admin",
    "/config",
    "/typo3/",
    "/admin/login",
    "/login",
    "/log-in",
    "/anmelden",
    "/signin",
    "/sign-in",
];

/// The resolved root of a crawl
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RootUrl {
    pub href: String,
    pub origin: String,
    pub hostname: String,
    /// Hostname without a leading `www.`
    pub base_url: String,
}

impl RootUrl {
    /// Normalize `raw` and resolve it into a crawl root
    pub fn parse(raw: &str) -> Result<Self> {
        let url = to_valid_url(raw)?;
        Ok(Self::from_url(&url))
    }

    pub fn from_url(url: &Url) -> Self {
        let hostname = url.host_str().unwrap_or_default().to_string();
        Self {
            href: url.as_str().to_string(),
            origin: url.origin().ascii_serialization(),
            base_url: domain_name(&hostname).to_string(),
            hostname,
        }
    }

    /// `{origin}/`
    pub fn origin_root(&self) -> String {
        format!("{}/", self.origin)
    }
}

/// Turn user input into an absolute http(s) URL.
///
/// A missing protocol defaults to `http://`; a bare `www.` host becomes
/// `http://www.`.
pub fn to_valid_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid_url(raw, "empty URL"));
    }

    let lower = trimmed.to_ascii_lowercase();
    let candidate = if lower.starts_with("http://") || lower.starts_with("https://") {
        trimmed.to_string()
    } else if lower.contains("://") {
        return Err(Error::invalid_url(raw, "unsupported protocol"));
    } else {
        format!("http://{}", trimmed)
    };

    let url = Url::parse(&candidate).map_err(|e| Error::invalid_url(raw, e.to_string()))?;
    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(Error::invalid_url(raw, "missing host")),
    }
}

/// Hostname without a leading `www.`
pub fn domain_name(hostname: &str) -> &str {
    hostname.strip_prefix("www.").unwrap_or(hostname)
}

/// Registrable domain of a host, when the public suffix list knows its suffix
pub fn registrable_domain(host: &str) -> Option<String> {
    let host = host.trim_end_matches('.').to_ascii_lowercase();
    let domain = psl::domain(host.as_bytes())?;
    if !domain.suffix().is_known() {
        return None;
    }
    std::str::from_utf8(domain.as_bytes()).ok().map(str::to_string)
}

/// Subdomain labels in front of the registrable domain, `www` removed
fn subdomain_labels(host: &str, domain: &str) -> Vec<String> {
    let host = host.trim_end_matches('.').to_ascii_lowercase();
    let prefix = host
        .strip_suffix(domain)
        .map(|p| p.trim_end_matches('.'))
        .unwrap_or_default();
    prefix
        .split('.')
        .filter(|label| !label.is_empty() && *label != "www")
        .map(str::to_string)
        .collect()
}

fn same_unlisted_host(a: &str, b: &str) -> bool {
    domain_name(&a.to_ascii_lowercase()) == domain_name(&b.to_ascii_lowercase())
}

/// Same registrable domain (same domain label and public suffix)
pub fn compare_domains(a: &str, b: &str) -> bool {
    match (registrable_domain(a), registrable_domain(b)) {
        (Some(da), Some(db)) => da == db,
        (None, None) => same_unlisted_host(a, b),
        _ => false,
    }
}

/// Same registrable domain and the same subdomain sequence, ignoring `www`
pub fn compare_subdomains(a: &str, b: &str) -> bool {
    match (registrable_domain(a), registrable_domain(b)) {
        (Some(da), Some(db)) => da == db && subdomain_labels(a, &da) == subdomain_labels(b, &db),
        (None, None) => same_unlisted_host(a, b),
        _ => false,
    }
}

/// Whether `candidate` belongs to the crawl rooted at `root`
pub fn is_internal(candidate: &str, root: &str, compare_subdomains_too: bool) -> bool {
    if compare_subdomains_too {
        compare_subdomains(candidate, root)
    } else {
        compare_domains(candidate, root)
    }
}

/// http(s) URL check
pub fn is_valid_url(href: &str) -> bool {
    Url::parse(href)
        .map(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or(false)
}

/// Link acceptance filter: http(s) only and no known non-HTML extension
pub fn accept_link(href: &str) -> Option<Url> {
    let url = Url::parse(href).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    let path = url.path().to_ascii_lowercase();
    if INVALID_EXTENSIONS.iter().any(|ext| path.ends_with(ext)) {
        return None;
    }
    Some(url)
}

/// Key under which an internal link is stored: origin, path and query
pub fn internal_link_key(url: &Url) -> String {
    let mut key = format!("{}{}", url.origin().ascii_serialization(), url.path());
    if let Some(query) = url.query().filter(|q| !q.is_empty()) {
        key.push('?');
        key.push_str(query);
    }
    key
}

/// Origin and path, used to record which page a resource was found on
pub fn page_key(url: &Url) -> String {
    format!("{}{}", url.origin().ascii_serialization(), url.path())
}

/// Swap `https://` and `http://`
pub fn flip_protocol(url: &str) -> String {
    if url.contains("https://") {
        url.replacen("https://", "http://", 1)
    } else if url.contains("http://") {
        url.replacen("http://", "https://", 1)
    } else {
        url.to_string()
    }
}

/// Last path segment
pub fn script_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_valid_url() {
        assert_eq!(to_valid_url("example.com").unwrap().as_str(), "http://example.com/");
        assert_eq!(
            to_valid_url("  www.example.com/about ").unwrap().as_str(),
            "http://www.example.com/about"
        );
        assert_eq!(
            to_valid_url("https://example.com/a?b=1").unwrap().as_str(),
            "https://example.com/a?b=1"
        );
        assert!(matches!(to_valid_url(""), Err(Error::InvalidUrl { .. })));
        assert!(matches!(to_valid_url("ftp://example.com"), Err(Error::InvalidUrl { .. })));
        assert!(matches!(to_valid_url("http://"), Err(Error::InvalidUrl { .. })));
    }

    #[test]
    fn test_root_url() {
        let root = RootUrl::parse("https://www.example.com/start").unwrap();
        assert_eq!(root.href, "https://www.example.com/start");
        assert_eq!(root.origin, "https://www.example.com");
        assert_eq!(root.hostname, "www.example.com");
        assert_eq!(root.base_url, "example.com");
        assert_eq!(root.origin_root(), "https://www.example.com/");
    }

    #[test]
    fn test_compare_domains() {
        assert!(compare_domains("example.com", "example.com"));
        assert!(compare_domains("www.example.com", "example.com"));
        assert!(compare_domains("sub.example.com", "example.com"));
        assert!(!compare_domains("example.com", "test.com"));
        assert!(!compare_domains("example.com", "example.net"));
    }

    #[test]
    fn test_multi_level_suffix() {
        assert!(compare_domains("shop.example.co.uk", "example.co.uk"));
        assert!(!compare_domains("example.co.uk", "other.co.uk"));
        assert_eq!(registrable_domain("www.shop.example.co.uk").as_deref(), Some("example.co.uk"));
    }

    #[test]
    fn test_compare_subdomains() {
        assert!(compare_subdomains("sub.example.com", "sub.example.com"));
        assert!(compare_subdomains("www.sub.example.com", "sub.example.com"));
        assert!(compare_subdomains("sub.example.com", "www.sub.example.com"));
        assert!(compare_subdomains("a.b.example.com", "a.b.example.com"));
        assert!(!compare_subdomains("a.b.example.com", "b.example.com"));
        assert!(!compare_subdomains("sub.example.com", "test.example.com"));
        assert!(compare_subdomains("www.example.com", "example.com"));
    }

    #[test]
    fn test_is_internal() {
        assert!(is_internal("www.example.com", "example.com", false));
        assert!(is_internal("sub.example.com", "example.com", false));
        assert!(!is_internal("example.com", "example.net", false));
        assert!(!is_internal("sub.example.com", "example.com", true));
    }

    #[test]
    fn test_unlisted_hosts_match_only_themselves() {
        assert!(compare_domains("127.0.0.1", "127.0.0.1"));
        assert!(!compare_domains("127.0.0.1", "127.0.0.2"));
        assert!(!compare_domains("127.0.0.1", "example.com"));
        assert!(compare_subdomains("localhost", "localhost"));
    }

    #[test]
    fn test_accept_link() {
        assert!(accept_link("https://example.com/about").is_some());
        assert!(accept_link("https://example.com/files/Report.PDF").is_none());
        assert!(accept_link("https://example.com/app.js").is_none());
        assert!(accept_link("https://example.com/index.jsp").is_some());
        assert!(accept_link("mailto:hi@example.com").is_none());
        assert!(accept_link("javascript:void(0)").is_none());
        assert!(accept_link("/relative").is_none());
    }

    #[test]
    fn test_link_keys() {
        let url = Url::parse("https://example.com/a/b?x=1#frag").unwrap();
        assert_eq!(internal_link_key(&url), "https://example.com/a/b?x=1");
        assert_eq!(page_key(&url), "https://example.com/a/b");

        let url = Url::parse("https://example.com/a?").unwrap();
        assert_eq!(internal_link_key(&url), "https://example.com/a");
    }

    #[test]
    fn test_flip_protocol() {
        assert_eq!(flip_protocol("https://example.com/"), "http://example.com/");
        assert_eq!(flip_protocol("http://example.com/"), "https://example.com/");
        assert_eq!(flip_protocol("example.com"), "example.com");
    }

    #[test]
    fn test_script_name() {
        assert_eq!(script_name("/js/matomo.js"), "matomo.js");
        assert_eq!(script_name("/"), "");
    }
}
