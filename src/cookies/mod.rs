// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Cookie normalization and merging
//!
//! Analytics cookies carry per-property or per-session suffixes
//! (`_ga_ABC123XYZ`, `_pk_id.1.a2b3`). They are collapsed to one template
//! name so the same cookie seen on different pages or sites is one entry.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::http::BrowserCookie;

/// Prefix -> template name, checked in order
const NAME_TEMPLATES: &[(&str, &str)] = &[
    ("_gat_gtag_UA_", "_gat_gtag_UA_XXXXXXX_X"),
    ("_gat_UA-", "_gat_UA-XXXXXXXX-X"),
    ("_ga_", "_ga_XXXXXXXXXX"),
    ("_gat_", "_gat_XXXXXXXX"),
    ("_pk_cvar.", "_pk_cvar.XX.XXXX"),
    ("_pk_id.", "_pk_id.X.XXXX"),
    ("_pk_ref.", "_pk_ref.X.XXXX"),
    ("_pk_ses.", "_pk_ses.X.XXXX"),
    ("_pk_testcookie.", "_pk_testcookie.X.XXXX"),
    ("_sp_id.", "_sp_id.XXXX"),
    ("_sp_ses.", "_sp_ses.XXXX"),
    ("gaDomain-", "gaDomain-XXXXXX"),
    ("incap_ses_", "incap_ses_XXX_XXXXXX"),
    ("visid_incap_", "visid_incap_XXXXXX"),
    ("_hjIncludedInSessionSample_", "_hjIncludedInSessionSample_xxxxxx"),
    ("_hjSession_", "_hjSession_xxxxx"),
    ("_hjSessionUser_", "_hjSessionUser_xxxxxxx"),
    ("Queue-it-", "Queue-it-xxx-xxx-xxx-xxx-xxx"),
];

/// Template name for volatile cookie names; other names pass through
pub fn normalize_cookie_name(raw: &str) -> String {
    NAME_TEMPLATES
        .iter()
        .find(|(prefix, _)| raw.starts_with(prefix))
        .map(|(_, template)| template.to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// One normalized cookie as reported
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CookieRecord {
    pub name: String,
    pub value: String,
    /// Domain without a leading `.`
    pub domain: String,
    pub path: String,
    /// Unix seconds; None for session cookies
    pub expires: Option<i64>,
    pub http_only: bool,
    pub secure: bool,
    pub session: bool,
    /// Remaining lifetime at observation time
    pub valid_for_minutes: Option<i64>,
    /// 1-based page index of the first observation
    pub first_added_on_page_number: u32,
    /// Pages (origin + path) the cookie was present on
    pub found_on_urls: BTreeSet<String>,
}

impl CookieRecord {
    /// Record a cookie observed on `page_url` while visiting page `page_number`
    pub fn observe(
        cookie: &BrowserCookie,
        page_number: u32,
        page_url: &str,
        now: DateTime<Utc>,
    ) -> Self {
        let expires = cookie.expires.map(|e| e.timestamp());
        let valid_for_minutes = cookie.expires.map(|e| {
            let seconds = (e - now).num_seconds() as f64;
            (seconds / 60.0).round() as i64
        });
        Self {
            name: normalize_cookie_name(&cookie.name),
            value: cookie.value.clone(),
            domain: cookie.domain.trim_start_matches('.').to_string(),
            path: cookie.path.clone(),
            expires,
            http_only: cookie.http_only,
            secure: cookie.secure,
            session: expires.is_none(),
            valid_for_minutes,
            first_added_on_page_number: page_number,
            found_on_urls: BTreeSet::from([page_url.to_string()]),
        }
    }

    /// Fields that identify which observation leads a merge
    fn precedence_key(&self) -> (u32, &str, &str, &str, bool, bool) {
        (
            self.first_added_on_page_number,
            &self.value,
            &self.domain,
            &self.path,
            self.http_only,
            self.secure,
        )
    }
}

/// Merge two observations of the same normalized cookie.
///
/// The earlier observation supplies value, domain, path and flags; expiry
/// and lifetime take the maximum, the first-seen page the minimum, and the
/// found-on pages the union. `merge_cookie(a, b) == merge_cookie(b, a)`.
pub fn merge_cookie(a: &CookieRecord, b: &CookieRecord) -> CookieRecord {
    let (lead, other) = if a.precedence_key() <= b.precedence_key() {
        (a, b)
    } else {
        (b, a)
    };

    let expires = lead.expires.max(other.expires);
    CookieRecord {
        name: lead.name.clone(),
        value: lead.value.clone(),
        domain: lead.domain.clone(),
        path: lead.path.clone(),
        expires,
        http_only: lead.http_only,
        secure: lead.secure,
        session: expires.is_none(),
        valid_for_minutes: lead.valid_for_minutes.max(other.valid_for_minutes),
        first_added_on_page_number: lead
            .first_added_on_page_number
            .min(other.first_added_on_page_number),
        found_on_urls: lead.found_on_urls.union(&other.found_on_urls).cloned().collect(),
    }
}

/// Merge two cookie maps keyed by normalized name; `first` keeps its order
pub fn merge_cookie_maps(
    first: &IndexMap<String, CookieRecord>,
    second: &IndexMap<String, CookieRecord>,
) -> IndexMap<String, CookieRecord> {
    let mut merged = first.clone();
    for (name, cookie) in second.iter() {
        let combined = match merged.get(name) {
            Some(existing) => merge_cookie(existing, cookie),
            None => cookie.clone(),
        };
        merged.insert(name.clone(), combined);
    }
    merged
}

/// "Gültig für" label of a cookie's lifetime
pub fn validity_label(cookie: &CookieRecord) -> Option<String> {
    if cookie.session {
        return Some("Session".to_string());
    }
    let minutes = cookie.valid_for_minutes?;
    let days = minutes.div_euclid(24 * 60);
    let label = match (days, minutes) {
        (1, _) => "1 Tag".to_string(),
        (d, _) if d > 1 => format!("{} Tage", d),
        (_, 1) => "1 Minute".to_string(),
        (_, m) if m > 1 => format!("{} Minuten", m),
        _ => "0 Minuten".to_string(),
    };
    Some(label)
}
