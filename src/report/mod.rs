// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Crawl reports
//!
//! A [`ScrapeReport`] is derived once from the final [`CollectedData`] and
//! never mutated afterwards; dual-engine crawls derive a second one from
//! the merged data.

mod merge;
mod website;

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

pub use merge::{merge_data, merge_reports};
pub use website::{InfoBox, InfoItem, WebsiteData};

use crate::cookies::CookieRecord;
use crate::crawler::{CollectedData, CrawlStatus};
use crate::fingerprint::HeaderSnapshot;
use crate::urls;

/// Message of a crawl in which no internal link answered 200
pub const NO_200_STATUS_CODES: &str = "ERR_NO_200_STATUS_CODES";

/// Path fragments of privacy, imprint and legal pages
const PRIVACY_PAGE_WORDS: [&str; 8] = [
    "datenschutz",
    "privacy",
    "impressum",
    "imprint",
    "cookie",
    "dsgvo",
    "gdpr",
    "legal",
];

/// An external host family with the headers of its first response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalUrl {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(flatten)]
    pub headers: HeaderSnapshot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalScript {
    pub url: String,
    pub scriptname: String,
    pub hostname: Vec<String>,
    pub pathname: String,
    pub server: Vec<String>,
}

/// Result of one crawl
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeReport {
    pub success: bool,
    pub message: Option<String>,
    /// Root hostname without `www.`
    pub base_url: String,
    pub cookies: Vec<CookieRecord>,
    /// Visited links in visit order
    pub internal_urls: Vec<String>,
    pub external_urls: Vec<ExternalUrl>,
    pub internal_tech_stack: Vec<String>,
    pub external_tech_stack: Vec<String>,
    pub external_scripts: Vec<ExternalScript>,
    pub email_addresses: Vec<String>,
    pub privacy_page: Vec<String>,
    pub page_title: String,
    pub page_description: String,
    pub pages_visited: u32,
    pub redirect_url: Option<String>,
    /// Seconds
    pub scrape_time: f64,
    pub engine: String,
}

impl ScrapeReport {
    /// Report of a finished single-engine crawl
    pub fn build(
        data: &CollectedData,
        status: &CrawlStatus,
        privacy_page: bool,
        engine: &str,
        elapsed: Duration,
    ) -> Self {
        let mut report = Self::from_data(data, privacy_page);
        report.success = !status.failed;
        report.message = status.message.clone();
        if report.message.is_none() && !data.has_status_200() {
            report.success = false;
            report.message = Some(NO_200_STATUS_CODES.to_string());
        }
        report.engine = engine.to_string();
        report.scrape_time = elapsed.as_secs_f64();
        report
    }

    /// Everything a report derives from collected data alone
    pub(crate) fn from_data(data: &CollectedData, privacy_page: bool) -> Self {
        Self {
            success: true,
            message: None,
            base_url: urls::domain_name(&data.url.hostname).to_string(),
            cookies: data.cookies.values().cloned().collect(),
            internal_urls: data.visited_links(),
            external_urls: external_urls(data),
            internal_tech_stack: data.tech_stack.internal.iter().cloned().collect(),
            external_tech_stack: data.tech_stack.external.iter().cloned().collect(),
            external_scripts: external_scripts(data),
            email_addresses: data.email_addresses.iter().cloned().collect(),
            privacy_page: if privacy_page {
                privacy_pages(data)
            } else {
                Vec::new()
            },
            page_title: data.page_title.clone(),
            page_description: data.page_description.clone(),
            pages_visited: data.pages_visited,
            redirect_url: data.redirect_url.clone(),
            scrape_time: 0.0,
            engine: String::new(),
        }
    }
}

/// Hosts requested from at least one internal page
fn external_urls(data: &CollectedData) -> Vec<ExternalUrl> {
    data.external_links
        .iter()
        .filter(|(_, host)| {
            host.found_on_urls.iter().any(|page| {
                Url::parse(page)
                    .ok()
                    .and_then(|u| u.host_str().map(|h| urls::is_internal(h, &data.url.hostname, false)))
                    .unwrap_or(false)
            })
        })
        .map(|(name, host)| ExternalUrl {
            name: name.clone(),
            headers: host.headers.clone(),
        })
        .collect()
}

fn external_scripts(data: &CollectedData) -> Vec<ExternalScript> {
    data.scripts
        .values()
        .map(|script| ExternalScript {
            url: script.url.clone(),
            scriptname: script.scriptname.clone(),
            hostname: vec![script.hostname.clone()],
            pathname: script.pathname.clone(),
            server: script.server.iter().cloned().collect(),
        })
        .collect()
}

fn privacy_pages(data: &CollectedData) -> Vec<String> {
    data.internal_links
        .keys()
        .filter(|link| {
            let path = Url::parse(link)
                .map(|u| u.path().to_lowercase())
                .unwrap_or_default();
            PRIVACY_PAGE_WORDS.iter().any(|word| path.contains(word))
        })
        .cloned()
        .collect()
}

/// Top-level crawl output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeOutput {
    pub results: ScrapeReport,
    pub website_data: WebsiteData,
}

impl ScrapeOutput {
    pub fn new(results: ScrapeReport) -> Self {
        let website_data = WebsiteData::from_report(&results);
        Self {
            results,
            website_data,
        }
    }
}
