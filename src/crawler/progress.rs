// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Per-page progress reporting

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};

use crate::browser::EngineKind;

/// Progress after one visited page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    pub pages_visited: u32,
    pub page_limit: u32,
    /// Internal links known so far, visited or not
    pub known_links: usize,
    pub engine: EngineKind,
    pub url: String,
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} / {} / {} ({}) {}",
            self.pages_visited, self.page_limit, self.known_links, self.engine, self.url
        )
    }
}

/// Receives every progress update of a crawl
pub type ProgressCallback = Arc<dyn Fn(&Progress) + Send + Sync>;

/// Log the line and hand it to the callback, if any
pub(crate) fn report(progress: &Progress, log: bool, callback: Option<&ProgressCallback>) {
    if log {
        info!("{}", progress);
    } else {
        debug!("{}", progress);
    }
    if let Some(callback) = callback {
        callback(progress);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[test]
    fn test_progress_line() {
        let progress = Progress {
            pages_visited: 2,
            page_limit: 5,
            known_links: 17,
            engine: EngineKind::Chromium,
            url: "https://example.com/about".to_string(),
        };
        assert_eq!(progress.to_string(), "2 / 5 / 17 (chromium) https://example.com/about");

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let callback: ProgressCallback = Arc::new(move |p: &Progress| sink.lock().push(p.pages_visited));
        report(&progress, false, Some(&callback));
        assert_eq!(*seen.lock(), vec![2]);
    }
}
