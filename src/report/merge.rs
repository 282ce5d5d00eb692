// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Dual-engine merge
//!
//! The primary (Chromium) run supplies the scalars; sets and maps are
//! unioned with the primary's order first.

use super::ScrapeReport;
use crate::cookies::merge_cookie_maps;
use indexmap::IndexMap;

use crate::crawler::{CollectedData, ExternalHost, LinkState};

/// Union of two crawls of the same root
pub fn merge_data(primary: &CollectedData, secondary: &CollectedData) -> CollectedData {
    let mut merged = primary.clone();

    for (link, state) in secondary.internal_links.iter() {
        let combined = match merged.internal_links.get(link) {
            Some(existing) => merge_link_state(existing, state),
            None => *state,
        };
        merged.internal_links.insert(link.clone(), combined);
    }

    merged.external_links = merge_external_hosts(&primary.external_links, &secondary.external_links);

    for (key, script) in secondary.scripts.iter() {
        if !merged.scripts.contains_key(key) {
            merged.scripts.insert(key.clone(), script.clone());
        }
    }

    merged.cookies = merge_cookie_maps(&primary.cookies, &secondary.cookies);
    merged.tech_stack.internal = primary
        .tech_stack
        .internal
        .union(&secondary.tech_stack.internal)
        .cloned()
        .collect();
    merged.tech_stack.external = primary
        .tech_stack
        .external
        .union(&secondary.tech_stack.external)
        .cloned()
        .collect();
    merged.email_addresses = primary
        .email_addresses
        .union(&secondary.email_addresses)
        .cloned()
        .collect();
    merged.pages_visited = primary.pages_visited.max(secondary.pages_visited);

    if merged.page_title.is_empty() {
        merged.page_title = secondary.page_title.clone();
    }
    if merged.page_description.is_empty() {
        merged.page_description = secondary.page_description.clone();
    }
    if merged.redirect_url.is_none() {
        merged.redirect_url = secondary.redirect_url.clone();
    }
    merged.anti_bot_detected = false;
    merged
}

/// A 200 from either engine wins
fn merge_link_state(a: &LinkState, b: &LinkState) -> LinkState {
    let status = if a.status == Some(200) || b.status == Some(200) {
        Some(200)
    } else {
        a.status.or(b.status)
    };
    LinkState {
        visited: a.visited || b.visited,
        status,
    }
}

fn merge_external_hosts(
    first: &IndexMap<String, ExternalHost>,
    second: &IndexMap<String, ExternalHost>,
) -> IndexMap<String, ExternalHost> {
    let mut merged = first.clone();
    for (name, host) in second.iter() {
        match merged.get_mut(name) {
            Some(existing) => {
                existing.first_added_on_page_number = existing
                    .first_added_on_page_number
                    .min(host.first_added_on_page_number);
                existing.found_on_urls.extend(host.found_on_urls.iter().cloned());
            }
            None => {
                merged.insert(name.clone(), host.clone());
            }
        }
    }
    merged
}

/// Report of a dual-engine crawl from the merged data and both reports.
///
/// Fails only when both engines failed; times add up, the page count is
/// the larger of the two.
pub fn merge_reports(
    merged: &CollectedData,
    primary: &ScrapeReport,
    secondary: &ScrapeReport,
    privacy_page: bool,
) -> ScrapeReport {
    let mut report = ScrapeReport::from_data(merged, privacy_page);
    report.success = primary.success || secondary.success;
    report.message = if report.success {
        None
    } else {
        primary.message.clone().or_else(|| secondary.message.clone())
    };
    report.pages_visited = primary.pages_visited.max(secondary.pages_visited);
    report.scrape_time = primary.scrape_time + secondary.scrape_time;
    report.engine = "both".to_string();
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::CrawlStatus;
    use crate::fingerprint::HeaderSnapshot;
    use crate::http::BrowserCookie;
    use crate::urls::RootUrl;
    use chrono::Utc;
    use std::time::Duration;

    fn run(cookies: &[&str], status: u16, pages: u32) -> CollectedData {
        let mut data = CollectedData::new(RootUrl::parse("https://example.com/").unwrap());
        data.pages_visited = 1;
        let now = Utc::now();
        for name in cookies {
            data.add_cookie(&BrowserCookie::new(*name, "v").domain("example.com"), "https://example.com/", now);
        }
        data.mark_visited("https://example.com/", Some(status));
        data.pages_visited = pages;
        data
    }

    #[test]
    fn test_disjoint_cookies_add_up() {
        let chromium = run(&["_ga", "_fbp"], 200, 3);
        let native = run(&["PHPSESSID"], 200, 2);
        let merged = merge_data(&chromium, &native);
        assert_eq!(merged.cookies.len(), 3);
        assert_eq!(merged.pages_visited, 3);

        let names: Vec<_> = merged.cookies.keys().collect();
        assert_eq!(names, vec!["_ga", "_fbp", "PHPSESSID"]);
    }

    #[test]
    fn test_merge_reports() {
        let chromium = run(&["_ga"], 403, 1);
        let native = run(&["_ga"], 200, 3);
        let a = ScrapeReport::build(&chromium, &CrawlStatus::default(), true, "chromium", Duration::from_secs(4));
        let b = ScrapeReport::build(&native, &CrawlStatus::default(), true, "native", Duration::from_secs(2));
        assert!(!a.success);
        assert!(b.success);

        let merged = merge_data(&chromium, &native);
        let report = merge_reports(&merged, &a, &b, true);
        assert!(report.success);
        assert_eq!(report.message, None);
        assert_eq!(report.pages_visited, 3);
        assert_eq!(report.scrape_time, 6.0);
        assert_eq!(report.engine, "both");
        assert_eq!(report.cookies.len(), 1);
        assert_eq!(
            merged.internal_links.get("https://example.com/").unwrap().status,
            Some(200)
        );
    }

    #[test]
    fn test_both_failed_keeps_primary_message() {
        let chromium = run(&[], 500, 1);
        let native = run(&[], 500, 1);
        let failed = CrawlStatus::failed("net::ERR_TIMED_OUT at https://example.com/");
        let a = ScrapeReport::build(&chromium, &failed, true, "chromium", Duration::ZERO);
        let b = ScrapeReport::build(&native, &CrawlStatus::default(), true, "native", Duration::ZERO);

        let report = merge_reports(&merge_data(&chromium, &native), &a, &b, true);
        assert!(!report.success);
        assert_eq!(report.message.as_deref(), Some("net::ERR_TIMED_OUT at https://example.com/"));
    }

    #[test]
    fn test_external_hosts_union() {
        let mut chromium = run(&[], 200, 2);
        let mut native = run(&[], 200, 2);
        chromium.record_external_host("cdn.net", HeaderSnapshot::default(), "https://example.com/a");
        native.pages_visited = 1;
        native.record_external_host("cdn.net", HeaderSnapshot::default(), "https://example.com/b");
        native.record_external_host("fonts.net", HeaderSnapshot::default(), "https://example.com/");

        let merged = merge_data(&chromium, &native);
        let cdn = merged.external_links.get("cdn.net").unwrap();
        assert_eq!(cdn.first_added_on_page_number, 1);
        assert_eq!(cdn.found_on_urls.len(), 2);
        assert_eq!(merged.external_links.len(), 2);
    }
}
