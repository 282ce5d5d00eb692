// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Error types for the crawler
//!
//! Two layers: [`Error`] for setup failures that abort a crawl before any
//! page is visited, and [`VisitError`] / [`ErrorKind`] for per-page failures
//! that the crawl loop recovers from or turns into a partial report.

use std::fmt;

use thiserror::Error;

/// Result type alias for crawler operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type
#[derive(Error, Debug)]
pub enum Error {
    /// Root URL could not be turned into an absolute http(s) URL
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// No browser engine could be launched
    #[error("No browser available: {0}")]
    NoBrowserAvailable(String),

    /// Option validation failed
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP client construction or request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an invalid URL error
    pub fn invalid_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Create a browser launch error
    pub fn no_browser<S: Into<String>>(msg: S) -> Self {
        Error::NoBrowserAvailable(msg.into())
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }

    /// Errors raised before the first page is visited; no partial report exists
    pub fn is_setup_failure(&self) -> bool {
        matches!(
            self,
            Error::InvalidUrl { .. } | Error::NoBrowserAvailable(_) | Error::Config(_)
        )
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Other(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Other(s.to_string())
    }
}

/// Category of a failed page visit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Certificate, handshake or connection refused/reset/closed
    Tls,
    /// DNS failure, unreachable address or aborted navigation
    Domain,
    /// The first page ended up on a different (sub)domain
    RedirectedOnFirstPage,
    /// Navigation exceeded the per-navigation bound
    Timeout,
    /// The page is a bot-check interstitial
    AntiBot,
    /// Anything else
    Unclassified,
}

impl ErrorKind {
    /// Stable identifier used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Tls => "TLS_ERROR",
            ErrorKind::Domain => "DOMAIN_ERROR",
            ErrorKind::RedirectedOnFirstPage => "REDIRECTED_ON_FIRST_PAGE",
            ErrorKind::Timeout => "TIMEOUT_ERROR",
            ErrorKind::AntiBot => "ANTI_BOT_CHALLENGE",
            ErrorKind::Unclassified => "UNCLASSIFIED_NAVIGATION_ERROR",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed page visit or navigation, tagged with its category
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct VisitError {
    pub kind: ErrorKind,
    pub message: String,
}

impl VisitError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Navigation exceeded `timeout_ms`
    pub fn timeout(timeout_ms: u64) -> Self {
        Self::new(
            ErrorKind::Timeout,
            format!("Navigation timeout of {} ms exceeded", timeout_ms),
        )
    }

    pub fn redirected_on_first_page(target: &str) -> Self {
        Self::new(
            ErrorKind::RedirectedOnFirstPage,
            format!("ERROR: redirected on first page to {}", target),
        )
    }

    pub fn anti_bot() -> Self {
        Self::new(ErrorKind::AntiBot, "ERROR: anti-bot challenge page detected")
    }

    pub fn unclassified(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unclassified, message)
    }
}

/// Helper trait for adding context to errors
pub trait ErrorContext<T> {
    /// Add operation context to error
    fn context(self, msg: &str) -> Result<T>;
}

impl<T, E: Into<Error>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, msg: &str) -> Result<T> {
        self.map_err(|e| {
            let err = e.into();
            match err {
                Error::NoBrowserAvailable(reason) => {
                    Error::NoBrowserAvailable(format!("{}: {}", msg, reason))
                }
                Error::Config(reason) => Error::Config(format!("{}: {}", msg, reason)),
                other => Error::Other(format!("{}: {}", msg, other)),
            }
        })
    }
}
