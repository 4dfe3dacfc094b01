//! Fragment fetching.
//!
//! Resolves a tag's src attribute against the request's base URL and performs
//! the outbound GET for the fragment body. Timeout and User-Agent come from
//! the shared client built in [`crate::initialization`]; the engine adds no
//! retries of its own.

use log::debug;
use thiserror::Error;
use url::Url;

/// Ways a single fragment resolution can fail.
///
/// Every variant is recovered by the caller (the tag becomes an inline
/// comment); none of these abort the surrounding page.
#[derive(Debug, Error)]
pub enum FragmentError {
    /// The tag's src attribute could not be joined into a fetch target.
    #[error("invalid include target \"{src}\": {source}")]
    Target {
        /// The src attribute as written in the tag
        src: String,
        /// The underlying URL parse failure
        source: url::ParseError,
    },

    /// The fragment origin answered outside the success range.
    #[error("fragment {url} returned status {status}")]
    Status {
        /// The absolute fetch target
        url: Url,
        /// The non-success status code
        status: reqwest::StatusCode,
    },

    /// The fetch itself failed: connect error, timeout, or body read.
    #[error(transparent)]
    Request(#[from] reqwest::Error),
}

/// Fetches one fragment body.
///
/// Relative src values resolve against `base` (the original request's URL);
/// absolute URLs are used as-is. Any status outside the 2xx range is treated
/// as failure.
pub async fn fetch_fragment(
    client: &reqwest::Client,
    src: &str,
    base: &Url,
) -> Result<String, FragmentError> {
    let target = base.join(src).map_err(|source| FragmentError::Target {
        src: src.to_string(),
        source,
    })?;

    debug!("Fetching fragment {target}");
    let response = client.get(target.clone()).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(FragmentError::Status {
            url: target,
            status,
        });
    }

    Ok(response.text().await?)
}
