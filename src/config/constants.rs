//! Configuration constants.
//!
//! Defaults and fixed operational parameters used throughout the gateway.

// Defaults for the CLI / library `Config`
/// Default directory served as the site root
pub const DEFAULT_DOCUMENT_ROOT: &str = "./public";
/// Default TCP port the gateway listens on
pub const DEFAULT_PORT: u16 = 8788;
/// Default bind address (loopback only)
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1";

/// Default per-fragment fetch timeout in seconds.
///
/// The engine performs no retries; a hung fragment origin would otherwise
/// stall the whole page for the client, so every outbound fetch is bounded
/// by this timeout (overridable via `--timeout-seconds`).
pub const FRAGMENT_TIMEOUT_SECS: u64 = 10;

/// Default User-Agent for outbound fragment fetches.
pub const DEFAULT_USER_AGENT: &str = concat!("esi_gateway/", env!("CARGO_PKG_VERSION"));

// Response and body size limits
/// Maximum document size in bytes (8MB) the interceptor will buffer.
/// Larger HTML responses are passed through unprocessed.
pub const MAX_DOCUMENT_BYTES: usize = 8 * 1024 * 1024;

// Fixed response headers for assembled documents
/// Content type forced onto every assembled document
pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";
/// Cache policy forced onto every assembled document. An assembled page is
/// request-specific output and must never be held by an edge or browser cache.
pub const NO_CACHE: &str = "no-cache";

/// File name served for directory requests
pub const INDEX_FILE: &str = "index.html";
