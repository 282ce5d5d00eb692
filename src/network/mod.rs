// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Network monitoring
//!
//! Engine-neutral view of the responses a page load produced.

mod event;

pub use event::{
    headers_from_json, headers_from_reqwest, insert_header, Headers, ObservedResponse,
    ResourceType,
};
