// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! One page visit
//!
//! `navigating -> (redirected | succeeded | failed)`. A visit mutates the
//! collected data through the borrow it is lent and reports failures as a
//! [`VisitError`]; redirect skips are a normal [`VisitOutcome`].

use chrono::Utc;
use tracing::debug;
use url::Url;

use super::antibot;
use super::data::{CollectedData, ScriptRecord};
use super::email::extract_email_addresses;
use super::options::{CrawlOptions, RedirectPolicy};
use crate::browser::{PageEngine, PageMeta};
use crate::error::VisitError;
use crate::fingerprint::{
    classify_headers, classify_host, generator_labels, meta_name_label, script_labels,
    HeaderSnapshot,
};
use crate::network::{ObservedResponse, ResourceType};
use crate::urls;

/// How a visit ended when it did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisitOutcome {
    Visited,
    /// Landed off the site on a later page; the rest of the visit was skipped
    RedirectSkipped { target: String },
}

/// Visit `link` with `engine`; `data.pages_visited` already counts it
pub(crate) async fn visit_link(
    engine: &mut dyn PageEngine,
    data: &mut CollectedData,
    options: &CrawlOptions,
    link: &str,
) -> Result<VisitOutcome, VisitError> {
    data.mark_visited(link, None);
    let snapshot = data.snapshot();
    let first_page = data.pages_visited == 1;

    let navigation = match engine
        .navigate(link, options.wait_until, options.navigation_timeout())
        .await
    {
        Ok(navigation) => navigation,
        Err(e) => {
            let key = page_key_of(link);
            record_responses(data, engine.take_responses(), &key);
            return Err(e);
        }
    };
    data.mark_visited(link, navigation.status);

    let page_key = page_key_of(&navigation.final_url);
    record_responses(data, engine.take_responses(), &page_key);

    if let Some(policy) = options.redirect_error {
        if left_site(link, &navigation.final_url, policy) {
            data.restore(snapshot);
            // Cookies of the redirect target belong to another site
            if let Err(e) = engine.take_cookies().await {
                debug!("Dropping redirect cookies failed: {}", e);
            }
            if first_page {
                data.redirect_url = Some(navigation.final_url.clone());
                return Err(VisitError::redirected_on_first_page(&navigation.final_url));
            }
            return Ok(VisitOutcome::RedirectSkipped {
                target: navigation.final_url,
            });
        }
    }

    if options.scroll {
        engine.scroll_to_end().await;
        record_responses(data, engine.take_responses(), &page_key);
    }

    let now = Utc::now();
    for cookie in engine.take_cookies().await? {
        data.add_cookie(&cookie, &page_key, now);
    }

    for href in engine.links().await? {
        add_discovered_link(data, &href);
    }

    if first_page {
        let meta = engine.metadata().await?;
        apply_page_meta(data, &meta);

        if let Some(selector) = &options.click_element {
            if engine.click_if_present(selector).await {
                debug!("Clicked {} on {}", selector, link);
                record_responses(data, engine.take_responses(), &page_key);
            }
        }
    }

    let content = engine.content().await?;
    if options.emails {
        for address in extract_email_addresses(&content) {
            data.email_addresses.insert(address);
        }
    }

    if antibot::is_challenge_page(&content) {
        data.anti_bot_detected = true;
        return Err(VisitError::anti_bot());
    }

    tokio::time::sleep(options.delay_duration()).await;
    // Late responses of this page arrive during the delay
    record_responses(data, engine.take_responses(), &page_key);

    Ok(VisitOutcome::Visited)
}

/// Origin and path of `raw`, or `raw` itself when it does not parse
fn page_key_of(raw: &str) -> String {
    Url::parse(raw)
        .map(|u| urls::page_key(&u))
        .unwrap_or_else(|_| raw.to_string())
}

/// Whether the page ended up on another domain (or subdomain) than `link`
fn left_site(link: &str, final_url: &str, policy: RedirectPolicy) -> bool {
    let hosts = Url::parse(link).ok().zip(Url::parse(final_url).ok());
    let Some((from, to)) = hosts else {
        return true;
    };
    match (from.host_str(), to.host_str()) {
        (Some(from), Some(to)) => !urls::is_internal(to, from, policy == RedirectPolicy::Subdomain),
        _ => true,
    }
}

/// Queue `href` when it passes the link filter and stays on the site
pub(crate) fn add_discovered_link(data: &mut CollectedData, href: &str) -> bool {
    let Some(url) = urls::accept_link(href) else {
        return false;
    };
    let Some(host) = url.host_str() else {
        return false;
    };
    if !urls::is_internal(host, &data.url.hostname, true) {
        return false;
    }
    data.add_internal_link(urls::internal_link_key(&url))
}

fn apply_page_meta(data: &mut CollectedData, meta: &PageMeta) {
    data.page_title = meta.title.trim().to_string();
    if let Some(description) = meta.content_of("description") {
        data.page_description = description.trim().to_string();
    }
    for (name, content) in &meta.meta {
        if name.eq_ignore_ascii_case("generator") {
            for label in generator_labels(content) {
                data.tech_stack.internal.insert(label);
            }
        }
        if let Some(label) = meta_name_label(name) {
            data.tech_stack.internal.insert(label.to_string());
        }
    }
}

/// Fold observed responses into the tech stack, external hosts and scripts
pub(crate) fn record_responses(
    data: &mut CollectedData,
    responses: Vec<ObservedResponse>,
    page_key: &str,
) {
    for response in responses {
        let Ok(url) = Url::parse(&response.url) else {
            continue;
        };
        if !matches!(url.scheme(), "http" | "https") {
            continue;
        }
        let Some(host) = url.host_str().map(str::to_string) else {
            continue;
        };

        let internal = urls::is_internal(&host, &data.url.hostname, false);
        let scriptname = urls::script_name(url.path()).to_string();
        let labels = classify_headers(&response.headers)
            .into_iter()
            .chain(script_labels(&scriptname).into_iter().map(str::to_string));
        let stack = if internal {
            &mut data.tech_stack.internal
        } else {
            &mut data.tech_stack.external
        };
        for label in labels {
            stack.insert(label);
        }

        if internal {
            continue;
        }

        let canonical = classify_host(&host);
        data.record_external_host(
            &canonical,
            HeaderSnapshot::from_headers(&response.headers),
            page_key,
        );

        if response.resource_type == ResourceType::Script || url.path().ends_with(".js") {
            data.record_script(ScriptRecord {
                url: response.url.clone(),
                scriptname,
                hostname: host,
                pathname: url.path().to_string(),
                server: response.header("server").map(str::to_string),
            });
        }
    }
}
