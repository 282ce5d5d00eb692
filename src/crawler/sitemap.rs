// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Sitemap discovery
//!
//! Checks well-known sitemap and feed paths without following redirects,
//! then opens every path that answered 200 in the engine and queues the
//! internal links it lists. Only ever adds links.

use std::time::Duration;

use futures::stream::{self, StreamExt};
use tracing::{debug, warn};
use url::Url;

use super::data::CollectedData;
use super::options::CrawlOptions;
use super::visitor::add_discovered_link;
use crate::browser::{document, PageEngine, WaitUntil};
use crate::http::{HttpClient, HttpClientConfig};

/// Sitemap and feed locations below the origin
pub const SITEMAP_PATHS: [&str; 18] = [
    "sitemap.xml",
    "sitemap-index.xml",
    "sitemap.xml.gz",
    "sitemap1.xml",
    "sitemap2.xml",
    "sitemap3.xml",
    "sitemap_index.xml",
    "sitemap/",
    "sitemap/index.xml",
    "sitemap/sitemap.xml",
    "sitemap/sitemap1.xml",
    "sitemap/sitemap_index.xml",
    "rss.xml",
    "atom.xml",
    "feed/",
    "feed.xml",
    "blogs/feed.xml",
    "news/rss.xml",
];

const SITEMAP_NAVIGATION_TIMEOUT: Duration = Duration::from_secs(20);
const CHECK_CONCURRENCY: usize = 4;

/// Enlarge the link set from sitemaps; returns the number of links added
pub(crate) async fn discover(
    engine: &mut dyn PageEngine,
    data: &mut CollectedData,
    options: &CrawlOptions,
) -> usize {
    let mut targets = Vec::new();

    if options.sitemap_search {
        let persona = options.engine_config();
        let config = HttpClientConfig::for_path_checks()
            .user_agent(persona.user_agent)
            .accept_language(persona.accept_language);
        match HttpClient::with_config(config) {
            Ok(client) => targets.extend(check_paths(&client, &data.url.origin).await),
            Err(e) => warn!("Sitemap check client failed: {}", e),
        }
    }

    if let Some(explicit) = &options.sitemap_url {
        match Url::parse(explicit) {
            Ok(url) if !targets.contains(&url) => targets.push(url),
            Ok(_) => {}
            Err(e) => debug!("Ignoring sitemap URL {}: {}", explicit, e),
        }
    }

    let mut added = 0;
    for target in &targets {
        added += harvest(engine, data, target).await;
    }

    // Sitemap loads are not page visits
    engine.take_responses();
    if let Err(e) = engine.take_cookies().await {
        debug!("Clearing sitemap cookies failed: {}", e);
    }

    debug!("Sitemaps of {} added {} links", data.url.origin, added);
    added
}

/// Paths below `origin` that answer 200 without redirecting, in path order
async fn check_paths(client: &HttpClient, origin: &str) -> Vec<Url> {
    let candidates: Vec<Url> = SITEMAP_PATHS
        .iter()
        .filter_map(|path| Url::parse(&format!("{}/{}", origin, path)).ok())
        .collect();

    stream::iter(candidates)
        .map(|url| async move {
            match client.check(&url).await {
                Ok(response) if response.status_code() == 200 => Some(url),
                Ok(_) => None,
                Err(e) => {
                    debug!("Sitemap check {} failed: {}", url, e);
                    None
                }
            }
        })
        .buffered(CHECK_CONCURRENCY)
        .filter_map(|found| async move { found })
        .collect()
        .await
}

/// Open one sitemap and queue its anchors and `<loc>` entries
async fn harvest(engine: &mut dyn PageEngine, data: &mut CollectedData, target: &Url) -> usize {
    if let Err(e) = engine
        .navigate(target.as_str(), WaitUntil::Load, SITEMAP_NAVIGATION_TIMEOUT)
        .await
    {
        debug!("Sitemap {} failed: {}", target, e);
        return 0;
    }

    let mut found = engine.links().await.unwrap_or_default();
    if let Ok(content) = engine.content().await {
        found.extend(document::sitemap_locations(&content));
    }

    found
        .iter()
        .filter(|href| add_discovered_link(data, href))
        .count()
}
