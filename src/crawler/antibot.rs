// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Bot-check interstitial detection and engine-switch recovery

use tracing::{info, warn};

use super::crawl_loop::{visit_links, CrawlStatus};
use super::data::CollectedData;
use super::options::CrawlOptions;
use super::progress::ProgressCallback;
use crate::browser::{BrowserVariant, EngineFactory};
use crate::error::VisitError;

/// Fingerprints of the Cloudflare challenge page, German and English
const CHALLENGE_MARKERS: [&str; 4] = [
    "Leistung und Sicherheit von Cloudflare",
    "muss die Sicherheit Ihrer Verbindung überprüfen, bevor Sie fortfahren können.",
    "Es wird geprüft, ob die Site-Verbindung sicher ist",
    "needs to review the security of your connection before proceeding",
];

pub fn is_challenge_page(html: &str) -> bool {
    CHALLENGE_MARKERS.iter().any(|marker| html.contains(marker))
}

/// Re-run the loop on a fresh fallback engine with the Firefox persona.
///
/// Links that never answered 200 are visited again; the page count keeps
/// what the first run already spent.
pub(crate) async fn recover(
    data: &mut CollectedData,
    options: &CrawlOptions,
    factory: &dyn EngineFactory,
    progress: Option<&ProgressCallback>,
) -> CrawlStatus {
    let config = options.engine_config_for(BrowserVariant::Firefox);
    info!(
        "Anti-bot challenge on {}, retrying with {} ({:?})",
        data.url.href, options.fallback_engine, config.variant
    );

    let mut engine = match factory.open(options.fallback_engine, &config).await {
        Ok(engine) => engine,
        Err(e) => {
            warn!("Fallback engine unavailable: {}", e);
            return CrawlStatus::failed(VisitError::anti_bot().message);
        }
    };

    data.anti_bot_detected = false;
    data.reset_unreached_links();
    let already_visited = data.pages_visited;
    data.pages_visited = 0;

    let mut status = visit_links(engine.as_mut(), data, options, progress).await;
    data.pages_visited += already_visited;
    engine.close().await;

    if data.anti_bot_detected && !status.failed {
        status = CrawlStatus::failed(VisitError::anti_bot().message);
    }
    status
}
