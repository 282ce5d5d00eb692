// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP client layer for the native engine and sitemap path checks
//!
//! A reqwest client that follows redirects itself so every Set-Cookie
//! header along the way lands in the cookie jar, the way a browser would
//! store them.

mod client;
mod cookie;
mod response;

pub use client::{HttpClient, HttpClientConfig};
pub use cookie::{BrowserCookie, CookieJar};
pub use response::Response;

/// Chromium desktop persona
pub const CHROME_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Firefox desktop persona
pub const FIREFOX_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0";

/// Audited sites are mostly German; both personas browse with a de-DE locale
pub const ACCEPT_LANGUAGE: &str = "de-DE,de;q=0.9,en-US;q=0.8,en;q=0.7";

/// Common HTTP headers
pub mod headers {
    pub const ACCEPT: &str = "accept";
    pub const ACCEPT_LANGUAGE: &str = "accept-language";
    pub const COOKIE: &str = "cookie";
    pub const LOCATION: &str = "location";
    pub const SET_COOKIE: &str = "set-cookie";
}
