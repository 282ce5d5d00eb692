// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Fingerprinting of hosts and technologies
//!
//! Turns noisy network observations into stable labels:
//! - hostnames into wildcard-templated host families
//! - response headers into CDN/server/runtime labels
//! - script names and generator tags into service labels

mod headers;
mod host;
mod meta;

pub use headers::{classify_headers, script_labels, HeaderSnapshot};
pub use host::classify_host;
pub use meta::{generator_labels, meta_name_label};
