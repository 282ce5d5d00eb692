// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Display boxes for the website record

use serde::{Deserialize, Serialize};

use super::ScrapeReport;
use crate::cookies::validity_label;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfoItem {
    pub label: String,
    pub value: Option<String>,
}

impl InfoItem {
    fn new(label: &str, value: Option<String>) -> Self {
        Self {
            label: label.to_string(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfoBox {
    pub title: String,
    pub items: Vec<InfoItem>,
}

/// Cookie and third-party host boxes of one report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebsiteData {
    pub cookies: Vec<InfoBox>,
    pub urls: Vec<InfoBox>,
    pub pages_visited: u32,
}

impl WebsiteData {
    pub fn from_report(report: &ScrapeReport) -> Self {
        let cookies = report
            .cookies
            .iter()
            .map(|cookie| InfoBox {
                title: cookie.name.clone(),
                items: vec![
                    InfoItem::new("Domain", Some(cookie.domain.clone())),
                    InfoItem::new("Gültig für", validity_label(cookie)),
                ],
            })
            .collect();

        let urls = report
            .external_urls
            .iter()
            .map(|host| InfoBox {
                title: host.name.clone(),
                items: host
                    .headers
                    .server_label()
                    .map(|server| vec![InfoItem::new("Server", Some(server))])
                    .unwrap_or_default(),
            })
            .collect();

        Self {
            cookies,
            urls,
            pages_visited: report.pages_visited,
        }
    }
}
