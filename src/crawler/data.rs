// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Collected data of one crawl
//!
//! Owned by the crawl loop and lent to each visit by `&mut`. Every map
//! iterates in insertion order: the link map's order is the visit order.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::cookies::{merge_cookie, CookieRecord};
use crate::fingerprint::HeaderSnapshot;
use crate::http::BrowserCookie;
use crate::urls::{self, RootUrl};

/// Visit state of one internal link
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkState {
    pub visited: bool,
    pub status: Option<u16>,
}

/// Infrastructure snapshot of one external host family
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalHost {
    /// Headers of the first response seen for the host
    pub headers: HeaderSnapshot,
    pub first_added_on_page_number: u32,
    /// Internal pages (origin + path) the host was requested from
    pub found_on_urls: BTreeSet<String>,
}

/// An external script
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptRecord {
    pub url: String,
    pub scriptname: String,
    pub hostname: String,
    pub pathname: String,
    pub server: Option<String>,
}

/// Technology labels by origin of the response they were derived from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TechStack {
    pub internal: IndexSet<String>,
    pub external: IndexSet<String>,
}

/// State restored when a visit turns out to be a redirect off the site
#[derive(Debug, Clone)]
pub struct Snapshot {
    external_links: IndexMap<String, ExternalHost>,
    scripts: IndexMap<String, ScriptRecord>,
    tech_stack: TechStack,
}

/// Everything one crawl learned about a site
#[derive(Debug, Clone, Default)]
pub struct CollectedData {
    pub url: RootUrl,
    pub internal_links: IndexMap<String, LinkState>,
    pub external_links: IndexMap<String, ExternalHost>,
    /// Keyed by host and path
    pub scripts: IndexMap<String, ScriptRecord>,
    /// Keyed by normalized cookie name
    pub cookies: IndexMap<String, CookieRecord>,
    pub tech_stack: TechStack,
    pub email_addresses: IndexSet<String>,
    /// Pages attempted so far; the only counter the page limit is checked against
    pub pages_visited: u32,
    pub page_title: String,
    pub page_description: String,
    pub redirect_url: Option<String>,
    /// Set when a page turned out to be a bot-check interstitial
    pub anti_bot_detected: bool,
}

impl CollectedData {
    /// Empty data seeded with the root URL and the root origin
    pub fn new(url: RootUrl) -> Self {
        let mut data = Self {
            url,
            ..Self::default()
        };
        let href = data.url.href.clone();
        let origin_root = data.url.origin_root();
        data.add_internal_link(href);
        data.add_internal_link(origin_root);
        data
    }

    /// Add administrative path guesses below the root origin
    pub fn add_extended_site_paths(&mut self) {
        for path in urls::EXTENDED_SITE_PATHS {
            let link = format!("{}{}", self.url.origin, path);
            self.add_internal_link(link);
        }
    }

    /// Add an unvisited link; returns false when it was already known
    pub fn add_internal_link(&mut self, link: impl Into<String>) -> bool {
        let link = link.into();
        if self.internal_links.contains_key(&link) {
            return false;
        }
        self.internal_links.insert(link, LinkState::default());
        true
    }

    /// First unvisited link in discovery order
    pub fn next_unvisited(&self) -> Option<String> {
        self.internal_links
            .iter()
            .find(|(_, state)| !state.visited)
            .map(|(link, _)| link.clone())
    }

    pub fn mark_visited(&mut self, link: &str, status: Option<u16>) {
        self.internal_links.insert(
            link.to_string(),
            LinkState {
                visited: true,
                status,
            },
        );
    }

    /// Whether any internal link answered with HTTP 200
    pub fn has_status_200(&self) -> bool {
        self.internal_links.values().any(|s| s.status == Some(200))
    }

    /// Visited links in visit order
    pub fn visited_links(&self) -> Vec<String> {
        self.internal_links
            .iter()
            .filter(|(_, s)| s.visited)
            .map(|(link, _)| link.clone())
            .collect()
    }

    /// Mark every link that never answered 200 as unvisited again
    pub fn reset_unreached_links(&mut self) -> usize {
        let mut reset = 0;
        for state in self.internal_links.values_mut() {
            if state.visited && state.status != Some(200) {
                *state = LinkState::default();
                reset += 1;
            }
        }
        reset
    }

    /// 1-based index of the page currently being visited
    pub fn current_page_number(&self) -> u32 {
        self.pages_visited.max(1)
    }

    /// Record a response from an external host family
    pub fn record_external_host(&mut self, canonical: &str, headers: HeaderSnapshot, page_url: &str) {
        let page_number = self.current_page_number();
        match self.external_links.get_mut(canonical) {
            Some(host) => {
                host.found_on_urls.insert(page_url.to_string());
            }
            None => {
                let host = ExternalHost {
                    headers,
                    first_added_on_page_number: page_number,
                    found_on_urls: BTreeSet::from([page_url.to_string()]),
                };
                self.external_links.insert(canonical.to_string(), host);
            }
        }
    }

    /// Record an external script, first observation wins
    pub fn record_script(&mut self, script: ScriptRecord) {
        let key = format!("{}{}", script.hostname, script.pathname);
        self.scripts.entry(key).or_insert(script);
    }

    /// Merge a browser cookie seen on `page_url`
    pub fn add_cookie(&mut self, cookie: &BrowserCookie, page_url: &str, now: DateTime<Utc>) {
        let record = CookieRecord::observe(cookie, self.current_page_number(), page_url, now);
        match self.cookies.get_mut(&record.name) {
            Some(existing) => {
                existing.found_on_urls.insert(page_url.to_string());
            }
            None => {
                self.cookies.insert(record.name.clone(), record);
            }
        }
    }

    /// Merge a full cookie record (dual-engine merge)
    pub fn merge_cookie_record(&mut self, record: &CookieRecord) {
        let merged = match self.cookies.get(&record.name) {
            Some(existing) => merge_cookie(existing, record),
            None => record.clone(),
        };
        self.cookies.insert(record.name.clone(), merged);
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            external_links: self.external_links.clone(),
            scripts: self.scripts.clone(),
            tech_stack: self.tech_stack.clone(),
        }
    }

    pub fn restore(&mut self, snapshot: Snapshot) {
        self.external_links = snapshot.external_links;
        self.scripts = snapshot.scripts;
        self.tech_stack = snapshot.tech_stack;
    }
}
