//! The include resolution engine.
//!
//! Takes a raw HTML document and the original request's base URL, discovers
//! every include tag in one pass, resolves each tag in discovery order, and
//! returns the assembled document. Tags are spliced by the byte offsets
//! recorded during the scan: static text between tags is copied verbatim and
//! each tag's individual resolution lands at its own position, so two
//! textually identical tags are fetched and substituted independently.
//!
//! The engine never raises an error to its caller. Every per-tag failure is
//! absorbed into an inline HTML comment and counted in the processing stats;
//! the page always renders.

use std::sync::Arc;

use log::{debug, error, warn};
use url::Url;

use crate::error_handling::{ErrorType, InfoType, ProcessingStats};
use crate::fetch::{fetch_fragment, FragmentError};
use crate::parse::{scan_include_tags, IncludeTag};

/// Resolves include tags in HTML documents.
///
/// Holds the shared HTTP client used for fragment fetches and the stats
/// tracker. Cheap to clone via the inner `Arc`s; carries no per-request
/// state, so one instance serves all requests.
#[derive(Clone)]
pub struct Resolver {
    client: Arc<reqwest::Client>,
    stats: Arc<ProcessingStats>,
}

impl Resolver {
    /// Creates a resolver over a shared client and stats tracker.
    pub fn new(client: Arc<reqwest::Client>, stats: Arc<ProcessingStats>) -> Self {
        Resolver { client, stats }
    }

    /// Resolves every include tag in `document` against `base`.
    ///
    /// Tags are processed sequentially in document order; each fetch is
    /// awaited before the next tag is touched, so total latency is the sum
    /// of the fragment latencies. A document without tags is returned
    /// unchanged and triggers no fetches.
    pub async fn resolve(&self, document: &str, base: &Url) -> String {
        let tags = scan_include_tags(document);
        if tags.is_empty() {
            return document.to_string();
        }

        debug!("Resolving {} include tag(s) against {base}", tags.len());

        let mut assembled = String::with_capacity(document.len());
        let mut cursor = 0usize;
        for tag in &tags {
            assembled.push_str(&document[cursor..tag.start]);
            assembled.push_str(&self.resolve_tag(tag, base).await);
            cursor = tag.end;
        }
        assembled.push_str(&document[cursor..]);
        assembled
    }

    /// Resolves one tag to its replacement text: the fetched fragment body,
    /// or a fallback comment per the tag's error policy.
    async fn resolve_tag(&self, tag: &IncludeTag, base: &Url) -> String {
        match fetch_fragment(&self.client, &tag.src, base).await {
            Ok(content) => {
                self.stats.increment_info(InfoType::FragmentResolved);
                content
            }
            Err(FragmentError::Status { url, status }) => {
                self.stats.increment_error(ErrorType::FragmentStatusError);
                warn!("Include {url} returned {status}");
                if tag.continue_on_error {
                    format!("<!-- ESI include failed: {} -->", tag.src)
                } else {
                    format!("<!-- ESI Error: Could not load {} -->", tag.src)
                }
            }
            Err(err) => {
                let error_type = match err {
                    FragmentError::Target { .. } => ErrorType::FragmentTargetError,
                    _ => ErrorType::FragmentFetchError,
                };
                self.stats.increment_error(error_type);
                error!("Include {} failed: {err}", tag.src);
                format!("<!-- ESI Error: {err} -->")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> (Resolver, Arc<ProcessingStats>) {
        let stats = Arc::new(ProcessingStats::new());
        let client = Arc::new(reqwest::Client::new());
        (Resolver::new(client, Arc::clone(&stats)), stats)
    }

    #[tokio::test]
    async fn test_resolve_without_tags_is_identity() {
        let (resolver, stats) = resolver();
        let base = Url::parse("http://site.example/").unwrap();
        let html = "<html><body><p>no directives here</p></body></html>";
        assert_eq!(resolver.resolve(html, &base).await, html);
        assert_eq!(stats.get_info_count(InfoType::FragmentResolved), 0);
    }

    #[tokio::test]
    async fn test_resolve_bad_target_becomes_error_comment() {
        // data: URLs cannot be joined against, forcing the Target error path
        // without any network traffic
        let (resolver, stats) = resolver();
        let base = Url::parse("data:text/plain,x").unwrap();
        let html = r#"A<esi:include src="/frag" />C"#;
        let out = resolver.resolve(html, &base).await;
        assert!(out.starts_with("A<!-- ESI Error: "));
        assert!(out.ends_with("-->C"));
        assert!(!out.contains("<esi:include"));
        assert_eq!(stats.get_error_count(ErrorType::FragmentTargetError), 1);
    }

    #[tokio::test]
    async fn test_resolve_bad_target_ignores_onerror_attribute() {
        // Exceptions carry the error message regardless of error policy
        let (resolver, _stats) = resolver();
        let base = Url::parse("data:text/plain,x").unwrap();
        let html = r#"<esi:include src="/frag" onerror="continue" />"#;
        let out = resolver.resolve(html, &base).await;
        assert!(out.starts_with("<!-- ESI Error: "));
        assert!(!out.contains("include failed"));
    }
}
