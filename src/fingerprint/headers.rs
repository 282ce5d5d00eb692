// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Technology labels from response headers and script file names

use serde::{Deserialize, Serialize};

use crate::network::Headers;

/// Markers searched anywhere in the serialized header map
const GLOBAL_MARKERS: &[(&[&str], &str)] = &[
    (&["x-amz-cf-pop", "cloudfront"], "CloudFront"),
    (&["akamai"], "Akamai"),
    (&["uploadserver"], "Google Cloud Storage"),
    (&["cloudflare"], "cloudflare"),
];

/// `server` value rules; a server header matching none is reported verbatim
const SERVER_RULES: &[(fn(&str) -> bool, &str)] = &[
    (|s| s.contains("ecacc ("), "ECAcc"),
    (|s| s.contains("ecs ("), "ECS"),
    (|s| s.contains("apache/"), "Apache"),
    (|s| s.contains("bunnycdn-"), "BunnyCDN"),
    (|s| s.contains("cookie first cdn"), "Cookie First CDN"),
    (|s| s.contains("microsoft-iis"), "Microsoft-IIS"),
    (|s| s.starts_with("nginx"), "nginx"),
];

/// Technology labels for one response, in detection order
pub fn classify_headers(headers: &Headers) -> Vec<String> {
    let mut labels: Vec<String> = Vec::new();
    let mut push = |label: String| {
        if !label.is_empty() && !labels.contains(&label) {
            labels.push(label);
        }
    };

    let serialized = headers
        .iter()
        .map(|(name, value)| format!("{}:{}", name, value))
        .collect::<Vec<_>>()
        .join("\n")
        .to_lowercase();
    for (markers, label) in GLOBAL_MARKERS {
        if markers.iter().any(|m| serialized.contains(m)) {
            push(label.to_string());
        }
    }

    if let Some(server) = headers.get("server") {
        let lower = server.to_lowercase();
        let label = SERVER_RULES
            .iter()
            .find(|(rule, _)| rule(&lower))
            .map(|(_, label)| label.to_string())
            .unwrap_or_else(|| server.trim().to_string());
        push(label);
    }

    if let Some(powered_by) = headers.get("x-powered-by") {
        if powered_by.to_lowercase().starts_with("php/") {
            push("PHP".to_string());
        } else {
            push(powered_by.trim().to_string());
        }
    }

    if let Some(via) = headers.get("via") {
        if via.to_lowercase().contains("cloudfront") {
            push("CloudFront".to_string());
        } else {
            push(via.trim().to_string());
        }
    }

    labels
}

/// Services recognizable from the script file name alone
pub fn script_labels(scriptname: &str) -> Vec<&'static str> {
    let mut labels = Vec::new();
    if scriptname.contains("matomo.js") || scriptname.contains("piwik.js") {
        labels.push("matomo");
    }
    if scriptname.contains("recaptcha__") {
        labels.push("Google reCAPTCHA");
    }
    if scriptname.contains("cast_framework.js") || scriptname.contains("cast_sender.js") {
        labels.push("Google Cast");
    }
    labels
}

/// Infrastructure headers kept for each external host
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderSnapshot {
    pub server: Option<String>,
    pub set_cookie: Option<String>,
    pub powered_by: Option<String>,
    pub via: Option<String>,
    pub akamai_cache_status: Option<String>,
    pub x_cache: Option<String>,
    pub x_amz_cf_pop: Option<String>,
    pub x_amz_rid: Option<String>,
}

impl HeaderSnapshot {
    pub fn from_headers(headers: &Headers) -> Self {
        let get = |name: &str| headers.get(name).cloned();
        Self {
            server: get("server"),
            set_cookie: get("set-cookie"),
            powered_by: get("x-powered-by"),
            via: get("via"),
            akamai_cache_status: get("akamai-cache-status"),
            x_cache: get("x-cache"),
            x_amz_cf_pop: get("x-amz-cf-pop"),
            x_amz_rid: get("x-amz-rid"),
        }
    }

    /// Best guess at who serves the host
    pub fn server_label(&self) -> Option<String> {
        if let Some(server) = self.server.as_ref().filter(|s| !s.is_empty()) {
            return Some(server.clone());
        }
        if let Some(powered_by) = self.powered_by.as_ref().filter(|s| !s.is_empty()) {
            return Some(powered_by.clone());
        }
        if let Some(via) = self.via.as_ref().filter(|s| !s.is_empty()) {
            return Some(via.clone());
        }
        if self.akamai_cache_status.is_some() {
            return Some("Akamai".to_string());
        }
        if self.x_cache.is_some() || self.x_amz_cf_pop.is_some() || self.x_amz_rid.is_some() {
            return Some("Amazon Web Services".to_string());
        }
        None
    }
}
