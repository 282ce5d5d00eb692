// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Technology labels from `<meta>` tags

/// Substring of the lower-cased generator content -> label
const GENERATOR_RULES: &[(&str, &str)] = &[
    ("wordpress", "WordPress"),
    ("wpml ", "WPML"),
    ("woocommerce ", "WooCommerce"),
    ("windows-azure-blob", "Windows-Azure-Blob"),
    ("typo3 ", "TYPO3"),
    ("site kit by google", "Site Kit by Google"),
    ("siquando ", "Siquando Web"),
    ("redux ", "Redux"),
    ("divi ", "Divi Theme"),
    ("php/", "PHP"),
    ("pepyaka/", "Pepyaka"),
    ("joomla", "Joomla"),
    ("elementor", "Elementor"),
];

/// Labels for one `<meta name="generator">` value. Unknown generators are
/// reported verbatim.
pub fn generator_labels(content: &str) -> Vec<String> {
    let lower = content.to_lowercase();
    let labels: Vec<String> = GENERATOR_RULES
        .iter()
        .filter(|(needle, _)| lower.contains(needle))
        .map(|(_, label)| label.to_string())
        .collect();
    if labels.is_empty() && !content.trim().is_empty() {
        return vec![content.trim().to_string()];
    }
    labels
}

/// Labels implied by a meta tag name alone
pub fn meta_name_label(name: &str) -> Option<&'static str> {
    match name {
        "next-head-count" => Some("Next.js"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_generators() {
        assert_eq!(generator_labels("WordPress 6.4.2"), vec!["WordPress"]);
        assert_eq!(generator_labels("TYPO3 CMS"), vec!["TYPO3"]);
        assert_eq!(
            generator_labels("WooCommerce 8.1 / WordPress"),
            vec!["WordPress", "WooCommerce"]
        );
        assert_eq!(generator_labels("Elementor 3.18.0; features: e_dom"), vec!["Elementor"]);
    }

    #[test]
    fn test_unknown_generator_passes_through() {
        assert_eq!(generator_labels(" Hugo 0.120.4 "), vec!["Hugo 0.120.4"]);
        assert!(generator_labels("  ").is_empty());
    }

    #[test]
    fn test_meta_name_label() {
        assert_eq!(meta_name_label("next-head-count"), Some("Next.js"));
        assert_eq!(meta_name_label("viewport"), None);
    }
}
