// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! The visit loop and its error policy

use tracing::debug;

use super::data::CollectedData;
use super::options::CrawlOptions;
use super::progress::{self, Progress, ProgressCallback};
use super::visitor::{visit_link, VisitOutcome};
use crate::browser::PageEngine;
use crate::error::ErrorKind;
use crate::urls;

/// How a run of the loop ended
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStatus {
    /// The first page could not be crawled
    pub failed: bool,
    pub message: Option<String>,
}

impl CrawlStatus {
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            failed: true,
            message: Some(message.into()),
        }
    }
}

/// Visit unvisited links in discovery order until the page limit is hit.
///
/// Failures after the first page skip the page. On the first page a TLS
/// failure is retried once with the other protocol; any other failure
/// stops the loop and fails the crawl. A bot-check page stops the loop
/// with `data.anti_bot_detected` set.
pub(crate) async fn visit_links(
    engine: &mut dyn PageEngine,
    data: &mut CollectedData,
    options: &CrawlOptions,
    callback: Option<&ProgressCallback>,
) -> CrawlStatus {
    let kind = engine.kind();

    while let Some(link) = data.next_unvisited() {
        if data.pages_visited >= options.page_limit {
            break;
        }
        data.pages_visited += 1;

        match visit_link(engine, data, options, &link).await {
            Ok(outcome) => {
                if let VisitOutcome::RedirectSkipped { target } = &outcome {
                    debug!("{} redirected to {}, skipped", link, target);
                }
                let line = Progress {
                    pages_visited: data.pages_visited,
                    page_limit: options.page_limit,
                    known_links: data.internal_links.len(),
                    engine: kind,
                    url: link,
                };
                progress::report(&line, options.log, callback);
            }
            Err(e) if e.kind == ErrorKind::AntiBot => {
                debug!("{} ({}): {}", link, e.kind, e);
                break;
            }
            Err(e) if data.pages_visited > 1 => {
                debug!("Skipping {} ({}): {}", link, e.kind, e);
            }
            Err(e) => {
                debug!("First page {} failed ({}): {}", link, e.kind, e);
                if e.kind == ErrorKind::Tls {
                    let flipped = urls::flip_protocol(&link);
                    if data.add_internal_link(flipped.clone()) {
                        debug!("Retrying first page as {}", flipped);
                        data.pages_visited -= 1;
                        continue;
                    }
                }
                return CrawlStatus::failed(e.message);
            }
        }
    }

    CrawlStatus::default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::testing::{ScriptedEngine, ScriptedPage};
    use crate::error::VisitError;
    use crate::urls::RootUrl;
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn data(root: &str) -> CollectedData {
        CollectedData::new(RootUrl::parse(root).unwrap())
    }

    fn options() -> CrawlOptions {
        CrawlOptions::new().delay(0)
    }

    fn tls_error() -> VisitError {
        VisitError::new(ErrorKind::Tls, "net::ERR_SSL_PROTOCOL_ERROR at http://example.com/")
    }

    #[tokio::test]
    async fn test_page_limit_one_visits_one_page() {
        let home = ScriptedPage::ok("https://example.com/")
            .link("https://example.com/a")
            .link("https://example.com/b")
            .link("https://example.com/c");
        let mut engine = ScriptedEngine::new(vec![home]);
        let mut data = data("https://example.com/");

        let status = visit_links(&mut engine, &mut data, &options().page_limit(1), None).await;
        assert!(!status.failed);
        assert_eq!(data.pages_visited, 1);
        assert_eq!(data.visited_links(), vec!["https://example.com/"]);
        assert_eq!(data.internal_links.len(), 4);
    }

    #[tokio::test]
    async fn test_visits_in_discovery_order() {
        let home = ScriptedPage::ok("https://example.com/")
            .link("https://example.com/b")
            .link("https://example.com/a");
        let b = ScriptedPage::ok("https://example.com/b").link("https://example.com/z");
        let mut engine = ScriptedEngine::new(vec![home, b]);
        let mut data = data("https://example.com/");

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let callback: ProgressCallback = Arc::new(move |p: &Progress| sink.lock().push(p.url.clone()));

        visit_links(&mut engine, &mut data, &options().page_limit(10), Some(&callback)).await;
        assert_eq!(
            data.visited_links(),
            vec![
                "https://example.com/",
                "https://example.com/b",
                "https://example.com/a",
                "https://example.com/z"
            ]
        );
        assert_eq!(seen.lock().len(), 4);
    }

    #[tokio::test]
    async fn test_later_failures_are_skipped() {
        let home = ScriptedPage::ok("https://example.com/")
            .link("https://example.com/broken")
            .link("https://example.com/ok");
        let broken = ScriptedPage::failing(
            "https://example.com/broken",
            VisitError::new(ErrorKind::Domain, "net::ERR_ABORTED at https://example.com/broken"),
        );
        let ok = ScriptedPage::ok("https://example.com/ok");
        let mut engine = ScriptedEngine::new(vec![home, broken, ok]);
        let mut data = data("https://example.com/");

        let status = visit_links(&mut engine, &mut data, &options().page_limit(5), None).await;
        assert!(!status.failed);
        assert_eq!(data.pages_visited, 3);
        let broken = data.internal_links.get("https://example.com/broken").unwrap();
        assert!(broken.visited);
        assert_eq!(broken.status, None);
    }

    #[tokio::test]
    async fn test_first_page_failure_stops() {
        let home = ScriptedPage::failing(
            "https://example.com/",
            VisitError::new(ErrorKind::Domain, "net::ERR_NAME_NOT_RESOLVED at https://example.com/"),
        );
        let mut engine = ScriptedEngine::new(vec![home]);
        let mut data = data("https://example.com/");
        data.add_internal_link("https://example.com/other");

        let status = visit_links(&mut engine, &mut data, &options(), None).await;
        assert!(status.failed);
        assert_eq!(
            status.message.as_deref(),
            Some("net::ERR_NAME_NOT_RESOLVED at https://example.com/")
        );
        assert_eq!(data.pages_visited, 1);
    }

    #[tokio::test]
    async fn test_tls_failure_flips_protocol_once() {
        let http = ScriptedPage::failing("http://example.com/", tls_error());
        let https = ScriptedPage::ok("https://example.com/");
        let mut engine = ScriptedEngine::new(vec![http, https]);
        let mut data = data("http://example.com/");

        let status = visit_links(&mut engine, &mut data, &options().page_limit(1), None).await;
        assert!(!status.failed);
        assert_eq!(data.pages_visited, 1);
        assert_eq!(
            data.visited_links(),
            vec!["http://example.com/", "https://example.com/"]
        );
        assert!(data.has_status_200());
    }

    #[tokio::test]
    async fn test_tls_failure_on_both_protocols_fails() {
        let http = ScriptedPage::failing("http://example.com/", tls_error());
        let https = ScriptedPage::failing("https://example.com/", tls_error());
        let mut engine = ScriptedEngine::new(vec![http, https]);
        let mut data = data("http://example.com/");

        let status = visit_links(&mut engine, &mut data, &options(), None).await;
        assert!(status.failed);
        assert_eq!(data.visited_links().len(), 2);
    }
}
