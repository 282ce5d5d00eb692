// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTML queries shared by the engines

use lazy_static::lazy_static;
use scraper::{Html, Selector};
use url::Url;

use super::PageMeta;
use crate::network::ResourceType;

lazy_static! {
    static ref ANCHORS: Selector = Selector::parse("a[href]").expect("anchor selector");
    static ref TITLE: Selector = Selector::parse("title").expect("title selector");
    static ref META: Selector = Selector::parse("meta[name]").expect("meta selector");
    static ref LOC: Selector = Selector::parse("loc").expect("loc selector");
    static ref SUBRESOURCES: Vec<(Selector, &'static str, ResourceType)> = vec![
        (Selector::parse("script[src]").expect("script selector"), "src", ResourceType::Script),
        (
            Selector::parse("link[rel~=stylesheet][href]").expect("stylesheet selector"),
            "href",
            ResourceType::Stylesheet
        ),
        (Selector::parse("link[rel~=preload][href]").expect("preload selector"), "href", ResourceType::Other),
        (Selector::parse("img[src]").expect("img selector"), "src", ResourceType::Image),
        (Selector::parse("iframe[src]").expect("iframe selector"), "src", ResourceType::Document),
    ];
}

/// Absolute anchor hrefs in document order, unparseable ones dropped
pub fn extract_links(html: &str, base: &Url) -> Vec<String> {
    let document = Html::parse_document(html);
    document
        .select(&ANCHORS)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(|href| base.join(href.trim()).ok())
        .map(String::from)
        .collect()
}

/// Title and `meta[name]` name/content pairs
pub fn extract_meta(html: &str) -> PageMeta {
    let document = Html::parse_document(html);
    let title = document
        .select(&TITLE)
        .next()
        .map(|t| t.text().collect::<String>().trim().to_string())
        .unwrap_or_default();
    let meta = document
        .select(&META)
        .filter_map(|m| {
            let name = m.value().attr("name")?;
            let content = m.value().attr("content").unwrap_or_default();
            Some((name.to_string(), content.to_string()))
        })
        .collect();
    PageMeta { title, meta }
}

/// Subresources a browser would fetch for this document, deduplicated
pub fn subresource_urls(html: &str, base: &Url) -> Vec<(Url, ResourceType)> {
    let document = Html::parse_document(html);
    let mut found: Vec<(Url, ResourceType)> = Vec::new();
    for (selector, attr, resource_type) in SUBRESOURCES.iter() {
        for element in document.select(selector) {
            let Some(value) = element.value().attr(attr) else {
                continue;
            };
            let Ok(url) = base.join(value.trim()) else {
                continue;
            };
            if !matches!(url.scheme(), "http" | "https") {
                continue;
            }
            if !found.iter().any(|(known, _)| known == &url) {
                found.push((url, *resource_type));
            }
        }
    }
    found
}

/// `<loc>` entries of a sitemap
pub fn sitemap_locations(xml: &str) -> Vec<String> {
    let document = Html::parse_document(xml);
    document
        .select(&LOC)
        .map(|loc| loc.text().collect::<String>().trim().to_string())
        .filter(|loc| !loc.is_empty())
        .collect()
}

/// Resolved `href` of the first element matching `selector`
///
/// Returns None for invalid selectors and for elements without a link.
pub fn element_href(html: &str, selector: &str, base: &Url) -> Option<Url> {
    let selector = Selector::parse(selector).ok()?;
    let document = Html::parse_document(html);
    let element = document.select(&selector).next()?;
    let href = element.value().attr("href")?;
    base.join(href.trim()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!doctype html><html><head>
        <title> Start | Example </title>
        <meta name="description" content="Eine Beispielseite">
        <meta name="generator" content="WordPress 6.4">
        <meta name="next-head-count" content="3">
        <link rel="stylesheet" href="/style.css">
        <link rel="preload" href="https://fonts.example.net/a.woff2">
        <script src="https://www.googletagmanager.com/gtm.js?id=GTM-1"></script>
        <script src="/app.js"></script>
        <script>inline()</script>
        </head><body>
        <a href="/about">About</a>
        <a href="https://other.com/x?y=1">Other</a>
        <a href="mailto:hi@example.com">Mail</a>
        <a id="consent" href="/datenschutz">Datenschutz</a>
        <img src="data:image/png;base64,AAAA">
        <img src="/logo.png"><img src="/logo.png">
        <iframe src="https://www.youtube.com/embed/1"></iframe>
        </body></html>"#;

    fn base() -> Url {
        Url::parse("https://example.com/start").unwrap()
    }

    #[test]
    fn test_extract_links() {
        let links = extract_links(PAGE, &base());
        assert_eq!(
            links,
            vec![
                "https://example.com/about",
                "https://other.com/x?y=1",
                "mailto:hi@example.com",
                "https://example.com/datenschutz",
            ]
        );
    }

    #[test]
    fn test_extract_meta() {
        let meta = extract_meta(PAGE);
        assert_eq!(meta.title, "Start | Example");
        assert_eq!(meta.content_of("description"), Some("Eine Beispielseite"));
        assert_eq!(meta.content_of("generator"), Some("WordPress 6.4"));
        assert_eq!(meta.meta.len(), 3);
    }

    #[test]
    fn test_subresource_urls() {
        let found = subresource_urls(PAGE, &base());
        let urls: Vec<_> = found.iter().map(|(u, _)| u.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://www.googletagmanager.com/gtm.js?id=GTM-1",
                "https://example.com/app.js",
                "https://example.com/style.css",
                "https://fonts.example.net/a.woff2",
                "https://example.com/logo.png",
                "https://www.youtube.com/embed/1",
            ]
        );
        assert_eq!(found[0].1, ResourceType::Script);
        assert_eq!(found[4].1, ResourceType::Image);
    }

    #[test]
    fn test_sitemap_locations() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
            <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
              <url><loc>https://example.com/a</loc></url>
              <url><loc> https://example.com/b </loc></url>
            </urlset>"#;
        assert_eq!(
            sitemap_locations(xml),
            vec!["https://example.com/a", "https://example.com/b"]
        );
    }

    #[test]
    fn test_element_href() {
        assert_eq!(
            element_href(PAGE, "#consent", &base()).map(String::from),
            Some("https://example.com/datenschutz".to_string())
        );
        assert_eq!(element_href(PAGE, "#missing", &base()), None);
        assert_eq!(element_href(PAGE, "[[", &base()), None);
    }
}
