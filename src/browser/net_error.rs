// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Navigation failure classification
//!
//! Chromium reports failed navigations as `net::ERR_*` codes. The native
//! engine's transport errors are mapped onto the same codes so both engines
//! produce identical error kinds and log lines.

use std::error::Error as StdError;
use std::io;

use crate::error::{ErrorKind, VisitError};

const NET_ERROR_PREFIX: &str = "net::ERR_";

/// A Chromium network error code
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetError {
    /// `ERR_SSL_*`
    Ssl(String),
    /// `ERR_CERT_*`
    Cert(String),
    ConnectionRefused,
    ConnectionClosed,
    ConnectionReset,
    Aborted,
    NameNotResolved,
    AddressUnreachable,
    TimedOut,
    /// Any other code, without the `ERR_` prefix
    Other(String),
}

impl NetError {
    /// Find the first `net::ERR_*` code in a failure message
    pub fn parse(message: &str) -> Option<Self> {
        let start = message.find(NET_ERROR_PREFIX)? + NET_ERROR_PREFIX.len();
        let code: String = message[start..]
            .chars()
            .take_while(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || *c == '_')
            .collect();
        if code.is_empty() {
            return None;
        }
        Some(Self::from_code(&code))
    }

    /// Code without the `ERR_` prefix, as in `NAME_NOT_RESOLVED`
    pub fn from_code(code: &str) -> Self {
        match code {
            "CONNECTION_REFUSED" => NetError::ConnectionRefused,
            "CONNECTION_CLOSED" => NetError::ConnectionClosed,
            "CONNECTION_RESET" => NetError::ConnectionReset,
            "ABORTED" => NetError::Aborted,
            "NAME_NOT_RESOLVED" => NetError::NameNotResolved,
            "ADDRESS_UNREACHABLE" => NetError::AddressUnreachable,
            "TIMED_OUT" => NetError::TimedOut,
            c if c.starts_with("SSL_") => NetError::Ssl(c.to_string()),
            c if c.starts_with("CERT_") => NetError::Cert(c.to_string()),
            c => NetError::Other(c.to_string()),
        }
    }

    /// Full code, as in `net::ERR_NAME_NOT_RESOLVED`
    pub fn code(&self) -> String {
        let code = match self {
            NetError::Ssl(c) | NetError::Cert(c) | NetError::Other(c) => c.as_str(),
            NetError::ConnectionRefused => "CONNECTION_REFUSED",
            NetError::ConnectionClosed => "CONNECTION_CLOSED",
            NetError::ConnectionReset => "CONNECTION_RESET",
            NetError::Aborted => "ABORTED",
            NetError::NameNotResolved => "NAME_NOT_RESOLVED",
            NetError::AddressUnreachable => "ADDRESS_UNREACHABLE",
            NetError::TimedOut => "TIMED_OUT",
        };
        format!("{}{}", NET_ERROR_PREFIX, code)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            NetError::Ssl(_)
            | NetError::Cert(_)
            | NetError::ConnectionRefused
            | NetError::ConnectionClosed
            | NetError::ConnectionReset => ErrorKind::Tls,
            NetError::Aborted | NetError::NameNotResolved | NetError::AddressUnreachable => {
                ErrorKind::Domain
            }
            NetError::TimedOut => ErrorKind::Timeout,
            NetError::Other(_) => ErrorKind::Unclassified,
        }
    }

    /// `{code} at {url}`, the shape Chromium uses
    pub fn into_visit_error(self, url: &str) -> VisitError {
        VisitError::new(self.kind(), format!("{} at {}", self.code(), url))
    }
}

/// Classify a failure message reported by a browser engine
pub fn classify_message(message: &str) -> VisitError {
    if message.contains("Navigation timeout of") || message.contains("Request timed out") {
        return VisitError::new(ErrorKind::Timeout, message);
    }
    match NetError::parse(message) {
        Some(err) => VisitError::new(err.kind(), message),
        None => VisitError::unclassified(message),
    }
}

/// Map a reqwest transport error onto the Chromium code it corresponds to
pub fn classify_transport_error(err: &reqwest::Error) -> VisitError {
    let url = err.url().map(|u| u.as_str().to_string()).unwrap_or_default();
    match net_error_of(err) {
        Some(net) => net.into_visit_error(&url),
        None => VisitError::unclassified(err.to_string()),
    }
}

fn net_error_of(err: &reqwest::Error) -> Option<NetError> {
    if err.is_timeout() {
        return Some(NetError::TimedOut);
    }
    if err.is_redirect() {
        return Some(NetError::Other("TOO_MANY_REDIRECTS".to_string()));
    }

    let mut source: Option<&(dyn StdError + 'static)> = err.source();
    let mut text = String::new();
    while let Some(current) = source {
        if let Some(io_err) = current.downcast_ref::<io::Error>() {
            match io_err.kind() {
                io::ErrorKind::ConnectionRefused => return Some(NetError::ConnectionRefused),
                io::ErrorKind::ConnectionReset => return Some(NetError::ConnectionReset),
                io::ErrorKind::ConnectionAborted | io::ErrorKind::UnexpectedEof => {
                    return Some(NetError::ConnectionClosed)
                }
                io::ErrorKind::TimedOut => return Some(NetError::TimedOut),
                _ => {}
            }
        }
        text.push_str(&current.to_string().to_lowercase());
        text.push('\n');
        source = current.source();
    }

    if text.contains("dns error")
        || text.contains("failed to lookup address")
        || text.contains("name or service not known")
        || text.contains("no such host")
    {
        return Some(NetError::NameNotResolved);
    }
    if text.contains("certificate") {
        return Some(NetError::Cert("CERT_INVALID".to_string()));
    }
    if text.contains("tls") || text.contains("handshake") || text.contains("ssl") {
        return Some(NetError::Ssl("SSL_PROTOCOL_ERROR".to_string()));
    }
    if text.contains("unreachable") {
        return Some(NetError::AddressUnreachable);
    }
    if err.is_connect() {
        return Some(NetError::Other("CONNECTION_FAILED".to_string()));
    }
    None
}
