// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Email address extraction from rendered HTML

use lazy_static::lazy_static;
use regex::Regex;

use crate::urls::INVALID_EXTENSIONS;

lazy_static! {
    /// Local part (ASCII specials plus Latin-1 letters) and a dotted domain
    /// with a 2-10 letter TLD; an optional `mailto:` prefix is dropped
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"(?:mailto:)?([a-zA-Z0-9.!#$%&'*+/=?^_`{|}~\x{00C0}-\x{00FF}-]+)@((?:[a-zA-Z0-9-]+\.)+[a-zA-Z]{2,10})"
    )
    .expect("email regex is valid");
}

/// Email addresses in order of first appearance, without duplicates
pub fn extract_email_addresses(html: &str) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    for captures in EMAIL_REGEX.captures_iter(html) {
        let (Some(local), Some(domain)) = (captures.get(1), captures.get(2)) else {
            continue;
        };
        let address = format!("{}@{}", local.as_str(), domain.as_str());
        if is_plausible_address(&address) && !found.contains(&address) {
            found.push(address);
        }
    }
    found
}

/// Rejects file names that look like addresses (`icon@2x.png`) and
/// malformed local parts
fn is_plausible_address(address: &str) -> bool {
    let lower = address.to_lowercase();
    if INVALID_EXTENSIONS.iter().any(|ext| lower.contains(ext)) {
        return false;
    }
    let Some((local, _domain)) = address.split_once('@') else {
        return false;
    };
    !local.is_empty() && !local.starts_with('.') && !local.ends_with('.') && !local.contains("..")
}
