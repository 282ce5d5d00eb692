// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Observed network responses

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Response headers with lower-cased names. Repeated headers are joined
/// with `\n`, the way browsers report `set-cookie`.
pub type Headers = BTreeMap<String, String>;

/// Resource type of an observed response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceType {
    /// Top-level or iframe document
    Document,
    /// Script tag or module
    Script,
    /// Link stylesheet
    Stylesheet,
    /// Image
    Image,
    /// Font
    Font,
    /// Media (audio/video)
    Media,
    /// XMLHttpRequest / fetch
    Xhr,
    /// Unknown
    Other,
}

impl ResourceType {
    /// Map a Chrome DevTools resource type name
    pub fn from_cdp(name: &str) -> Self {
        match name {
            "Document" => ResourceType::Document,
            "Script" => ResourceType::Script,
            "Stylesheet" => ResourceType::Stylesheet,
            "Image" => ResourceType::Image,
            "Font" => ResourceType::Font,
            "Media" => ResourceType::Media,
            "XHR" | "Fetch" => ResourceType::Xhr,
            _ => ResourceType::Other,
        }
    }
}

/// One response seen while a page was loading
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservedResponse {
    pub url: String,
    pub status: Option<u16>,
    pub headers: Headers,
    pub resource_type: ResourceType,
}

impl ObservedResponse {
    pub fn new(url: impl Into<String>, resource_type: ResourceType) -> Self {
        Self {
            url: url.into(),
            status: None,
            headers: Headers::new(),
            resource_type,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Add a header, lower-casing the name and joining repeats
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        insert_header(&mut self.headers, name, value.into());
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }
}

/// Insert into a lower-cased header map, joining repeated names with `\n`
pub fn insert_header(headers: &mut Headers, name: &str, value: String) {
    let name = name.to_ascii_lowercase();
    match headers.get_mut(&name) {
        Some(existing) => {
            existing.push('\n');
            existing.push_str(&value);
        }
        None => {
            headers.insert(name, value);
        }
    }
}

/// Convert a `reqwest` header map
pub fn headers_from_reqwest(map: &reqwest::header::HeaderMap) -> Headers {
    let mut headers = Headers::new();
    for (name, value) in map {
        insert_header(
            &mut headers,
            name.as_str(),
            String::from_utf8_lossy(value.as_bytes()).into_owned(),
        );
    }
    headers
}

/// Convert a DevTools header object (`{"Name": "value", ..}`)
pub fn headers_from_json(value: &serde_json::Value) -> Headers {
    let mut headers = Headers::new();
    if let Some(object) = value.as_object() {
        for (name, value) in object {
            let value = match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            insert_header(&mut headers, name, value);
        }
    }
    headers
}
