use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum::IntoEnumIterator;
use strum_macros::EnumIter;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Types of errors that can occur while assembling a response.
///
/// Categorizes failure modes for tracking and reporting. Per-fragment
/// failures are recovered in place (they become inline comments in the
/// page); `DocumentError` is the only page-fatal category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum ErrorType {
    /// A fragment origin answered with a non-success status
    FragmentStatusError,
    /// A fragment fetch failed outright (connect error, timeout, body read)
    FragmentFetchError,
    /// A tag's src attribute could not be resolved to a fetch target
    FragmentTargetError,
    /// The upstream document body could not be buffered or rebuilt
    DocumentError,
}

impl ErrorType {
    /// Human-readable label for statistics output.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::FragmentStatusError => "Fragment status error",
            ErrorType::FragmentFetchError => "Fragment fetch error",
            ErrorType::FragmentTargetError => "Fragment target error",
            ErrorType::DocumentError => "Document assembly error",
        }
    }
}

/// Informational events counted during normal operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum InfoType {
    /// A request passed through the interceptor
    RequestServed,
    /// A non-HTML response was returned untouched
    NonHtmlPassthrough,
    /// An HTML response exceeded the document cap and was returned untouched
    OversizeDocumentPassthrough,
    /// An HTML document was scanned and rebuilt
    DocumentAssembled,
    /// A fragment was fetched and spliced successfully
    FragmentResolved,
}

impl InfoType {
    /// Human-readable label for statistics output.
    pub fn as_str(&self) -> &'static str {
        match self {
            InfoType::RequestServed => "Requests served",
            InfoType::NonHtmlPassthrough => "Non-HTML passthrough",
            InfoType::OversizeDocumentPassthrough => "Oversize document passthrough",
            InfoType::DocumentAssembled => "Documents assembled",
            InfoType::FragmentResolved => "Fragments resolved",
        }
    }
}

/// Thread-safe processing statistics tracker.
///
/// Tracks the count of each error and info type using atomic counters,
/// allowing concurrent access from all request tasks. All counters are
/// initialized to zero on creation.
pub struct ProcessingStats {
    errors: HashMap<ErrorType, AtomicUsize>,
    info: HashMap<InfoType, AtomicUsize>,
}

impl ProcessingStats {
    /// Creates a tracker with every counter at zero.
    pub fn new() -> Self {
        let mut errors = HashMap::new();
        for error in ErrorType::iter() {
            errors.insert(error, AtomicUsize::new(0));
        }
        let mut info = HashMap::new();
        for event in InfoType::iter() {
            info.insert(event, AtomicUsize::new(0));
        }
        ProcessingStats { errors, info }
    }

    /// Increments the counter for an error type.
    pub fn increment_error(&self, error: ErrorType) {
        // All ErrorType variants are initialized in new(), so unwrap() is safe
        self.errors
            .get(&error)
            .unwrap()
            .fetch_add(1, Ordering::Relaxed);
    }

    /// Increments the counter for an info event.
    pub fn increment_info(&self, event: InfoType) {
        // All InfoType variants are initialized in new(), so unwrap() is safe
        self.info
            .get(&event)
            .unwrap()
            .fetch_add(1, Ordering::Relaxed);
    }

    /// Returns the count for an error type.
    pub fn get_error_count(&self, error: ErrorType) -> usize {
        self.errors.get(&error).unwrap().load(Ordering::SeqCst)
    }

    /// Returns the count for an info event.
    pub fn get_info_count(&self, event: InfoType) -> usize {
        self.info.get(&event).unwrap().load(Ordering::SeqCst)
    }

    /// Total errors across all types.
    pub fn total_errors(&self) -> usize {
        ErrorType::iter().map(|e| self.get_error_count(e)).sum()
    }

    /// Total fragment failures (status, fetch, and target errors).
    pub fn total_fragment_failures(&self) -> usize {
        self.get_error_count(ErrorType::FragmentStatusError)
            + self.get_error_count(ErrorType::FragmentFetchError)
            + self.get_error_count(ErrorType::FragmentTargetError)
    }
}

impl Default for ProcessingStats {
    fn default() -> Self {
        Self::new()
    }
}
