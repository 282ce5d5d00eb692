// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Hostname fingerprints
//!
//! Sharded and numbered CDN edge hosts (`scontent-fra3-1.xx.fbcdn.net`,
//! `d1234.cloudfront.net`) collapse into one wildcard-templated entry.
//! Rules are checked in order and the first match wins.

/// Shape predicate on a prepared (lower-cased, `www.`-less) hostname
type HostShape = fn(&str) -> bool;

/// Ordered hostname rules
const HOST_RULES: &[(HostShape, &str)] = &[
    (|h| h.contains("d-") && h.contains(".ampproject.net"), "d-*.ampproject.net"),
    (|h| h.contains(".cloudfront.net"), "*.cloudfront.net"),
    (|h| h.contains("---") && h.ends_with(".googlevideo.com"), "*---*-*.googlevideo.com"),
    (|h| h.ends_with(".safeframe.googlesyndication.com"), "*.safeframe.googlesyndication.com"),
    (|h| h.ends_with("atari-embeds.googleusercontent.com"), "*-atari-embeds.googleusercontent.com"),
    (|h| h.starts_with("lh") && h.ends_with("googleusercontent.com"), "lh*.googleusercontent.com"),
    (|h| h.contains("linkedin.com") && h.starts_with("px."), "px.ads.linkedin.com"),
    (|h| h.contains(".tile.openstreetmap."), "tile.openstreetmap.org"),
    (|h| h.ends_with("wixsite.com"), "wixsite.com"),
    (|h| h.contains(".openstreetmap.") && h.starts_with("tile"), "tile.openstreetmap.org"),
    (|h| h.contains("facebook.com") && h.starts_with("static"), "static*.facebook.com"),
    (|h| h.contains(".fbcdn.net") && h.starts_with("external"), "external-*.fbcdn.net"),
    (|h| h.contains(".fbcdn.net") && h.starts_with("static"), "static.*.fbcdn.net"),
    (|h| h.contains(".fbcdn.net") && h.contains("scontent"), "scontent-*-*.*.fbcdn.net"),
    (|h| h.contains(".fbcdn.net") && h.contains("video"), "video-*-*.*.fbcdn.net"),
    (|h| h.contains("cdninstagram.com") && h.contains("scontent"), "scontent-*-*.cdninstagram.com"),
    (|h| h.contains("cdninstagram.com") && h.contains("video"), "video-*-*.cdninstagram.com"),
    (|h| h.contains("wix-engage-visitors-prod-"), "wix-engage-visitors-prod-*.firebaseio.com"),
    (|h| h.contains(".matomo.cloud") && h != "cdn.matomo.cloud", "*.matomo.cloud"),
    (|h| h.ends_with(".typeform.com"), "*.typeform.com"),
    (|h| h.ends_with(".akamaihd.net"), "*.akamaihd.net"),
    (|h| h.ends_with("s3.amazonaws.com"), "s3.amazonaws.com"),
    (|h| h.ends_with(".amazonaws.com"), "*.*.amazonaws.com"),
    (|h| h.ends_with(".fls.doubleclick.net"), "*.fls.doubleclick.net"),
    (|h| h.starts_with("googleads") && h.ends_with("g.doubleclick.net"), "googleads.g.doubleclick.net"),
    (|h| h.starts_with("clients") && h.ends_with("google.com"), "clients*.google.com"),
    (|h| h.ends_with("akstat.io"), "akstat.io"),
    (|h| h.ends_with(".azureedge.net"), "*.azureedge.net"),
    (|h| h.ends_with(".akamaized.net"), "*.akamaized.net"),
    (|h| h.ends_with(".nuid.nmrodam.com"), "*.nuid.nmrodam.com"),
    (|h| h.ends_with(".trk.sensic.net"), "*.trk.sensic.net"),
    (|h| h.ends_with(".gstatic.com") && h.starts_with('t'), "t*.gstatic.com"),
    (|h| h.ends_with(".gstatic.com") && h.starts_with("encrypted"), "encrypted-*.gstatic.com"),
];

/// Lower-case and strip one leading `www.` and one leading `.`
fn prepare(hostname: &str) -> String {
    let host = hostname.trim().to_ascii_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);
    host.strip_prefix('.').unwrap_or(host).to_string()
}

/// Canonical fingerprint of a raw hostname; the prepared hostname when no
/// rule matches
pub fn classify_host(hostname: &str) -> String {
    let host = prepare(hostname);
    HOST_RULES
        .iter()
        .find(|(shape, _)| shape(&host))
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or(host)
}
