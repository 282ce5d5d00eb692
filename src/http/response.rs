// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Final response of a native-engine request

use bytes::Bytes;
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::StatusCode;
use url::Url;

use crate::network::{headers_from_reqwest, Headers};

/// Last hop of a request after redirects were followed
#[derive(Debug, Clone)]
pub struct Response {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// Empty for existence checks
    pub body: Bytes,
    /// URL of the last hop
    pub url: Url,
    /// Redirect hops followed before this response
    pub redirects: usize,
}

impl Response {
    pub fn new(status: StatusCode, headers: HeaderMap, body: Bytes, url: Url) -> Self {
        Self {
            status,
            headers,
            body,
            url,
            redirects: 0,
        }
    }

    pub fn with_redirects(mut self, redirects: usize) -> Self {
        self.redirects = redirects;
        self
    }

    pub fn was_redirected(&self) -> bool {
        self.redirects > 0
    }

    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    /// Body decoded as UTF-8, invalid sequences replaced
    pub fn text_lossy(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Whether the body is a document worth parsing for subresources
    pub fn is_html(&self) -> bool {
        let Some(content_type) = self.headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
            return false;
        };
        ["text/html", "application/xhtml"]
            .iter()
            .any(|mime| content_type.contains(mime))
    }

    /// Headers with lower-cased names, repeated headers joined by `\n`
    pub fn observed_headers(&self) -> Headers {
        headers_from_reqwest(&self.headers)
    }
}
