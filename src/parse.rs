//! Include tag scanning.
//!
//! Finds `<esi:include ... />` directives in an HTML document. The scan runs
//! once, left to right, over the pristine document text; each discovered tag
//! carries its byte offsets so substitution can splice positionally without
//! ever rescanning partially assembled output.

use regex::Regex;
use std::sync::LazyLock;

// Tag pattern: self-closing only, src must be the first attribute.
// A closing-tag variant (<esi:include ...></esi:include>) is not recognized.
const INCLUDE_TAG_PATTERN: &str = r#"<esi:include\s+src="([^"]+)"[^>]*/>"#;

// Lenient error handling triggers on this exact literal inside the tag text;
// quoting and spacing variations are deliberately not handled.
const ONERROR_CONTINUE_LITERAL: &str = r#"onerror="continue""#;

static INCLUDE_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(INCLUDE_TAG_PATTERN).expect("Failed to compile include tag pattern - this is a bug")
});

/// One located include directive within a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeTag {
    /// The tag's src attribute, as written (absolute URL or relative path)
    pub src: String,
    /// Whether the tag carries `onerror="continue"`
    pub continue_on_error: bool,
    /// The exact matched tag text
    pub raw: String,
    /// Byte offset of the tag's first byte in the scanned document
    pub start: usize,
    /// Byte offset one past the tag's last byte
    pub end: usize,
}

/// Scans a document for include tags, in document order.
///
/// Returns an empty vector for documents without directives; the caller can
/// skip all further work in that case. Matches never overlap, and offsets
/// always refer to the text that was scanned.
pub fn scan_include_tags(document: &str) -> Vec<IncludeTag> {
    INCLUDE_TAG
        .captures_iter(document)
        .map(|caps| {
            let whole = caps.get(0).expect("capture group 0 always matches");
            let src = caps
                .get(1)
                .expect("src capture group is not optional")
                .as_str()
                .to_string();
            IncludeTag {
                src,
                continue_on_error: whole.as_str().contains(ONERROR_CONTINUE_LITERAL),
                raw: whole.as_str().to_string(),
                start: whole.start(),
                end: whole.end(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_no_tags() {
        let tags = scan_include_tags("<html><body>plain page</body></html>");
        assert!(tags.is_empty());
    }

    #[test]
    fn test_scan_single_tag() {
        let html = r#"<p>A</p><esi:include src="/header.html" /><p>C</p>"#;
        let tags = scan_include_tags(html);
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].src, "/header.html");
        assert!(!tags[0].continue_on_error);
        assert_eq!(&html[tags[0].start..tags[0].end], tags[0].raw);
    }

    #[test]
    fn test_scan_onerror_continue() {
        let html = r#"<esi:include src="/x" onerror="continue" />"#;
        let tags = scan_include_tags(html);
        assert_eq!(tags.len(), 1);
        assert!(tags[0].continue_on_error);
    }

    #[test]
    fn test_scan_onerror_other_value_is_strict() {
        let html = r#"<esi:include src="/x" onerror="abort" />"#;
        let tags = scan_include_tags(html);
        assert_eq!(tags.len(), 1);
        assert!(!tags[0].continue_on_error);
    }

    #[test]
    fn test_scan_extra_attributes() {
        let html = r#"<esi:include src="/nav" alt="nav" data-slot="top" />"#;
        let tags = scan_include_tags(html);
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].src, "/nav");
    }

    #[test]
    fn test_scan_preserves_document_order() {
        let html = r#"<esi:include src="/one" /> mid <esi:include src="/two" />"#;
        let tags = scan_include_tags(html);
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].src, "/one");
        assert_eq!(tags[1].src, "/two");
        assert!(tags[0].end <= tags[1].start);
    }

    #[test]
    fn test_scan_duplicate_identical_tags() {
        // Identical text at two positions yields two independent tags
        let html = r#"<esi:include src="/ad" /><hr/><esi:include src="/ad" />"#;
        let tags = scan_include_tags(html);
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].raw, tags[1].raw);
        assert_ne!(tags[0].start, tags[1].start);
    }

    #[test]
    fn test_scan_ignores_closing_tag_variant() {
        let html = r#"<esi:include src="/x"></esi:include>"#;
        assert!(scan_include_tags(html).is_empty());
    }

    #[test]
    fn test_scan_requires_src_attribute() {
        let html = r#"<esi:include onerror="continue" />"#;
        assert!(scan_include_tags(html).is_empty());
    }

    #[test]
    fn test_scan_absolute_url_src() {
        let html = r#"<esi:include src="https://assets.example/frag.html" />"#;
        let tags = scan_include_tags(html);
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].src, "https://assets.example/frag.html");
    }
}
