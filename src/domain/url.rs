//! Shortened URL records and the URL format check.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Scheme, dotted host with a 2+ letter TLD, optional path free of control
/// characters (the URL is echoed back in a `Location` header).
static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^https?://[a-z0-9_.-]+\.[a-z]{2,}(/[^\x00-\x1f\x7f]*)?$")
        .unwrap_or_else(|e| panic!("URL pattern must compile: {e}"))
});

/// Whether `candidate` is an absolute http(s) URL the shortener accepts.
#[must_use]
pub fn is_valid_url(candidate: &str) -> bool {
    URL_PATTERN.is_match(candidate)
}

/// A stored original URL and its short code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortUrl {
    /// URL exactly as submitted.
    pub original: String,

    /// Unique, monotonically assigned code.
    pub short: u64,
}

impl ShortUrl {
    /// Pair an original URL with its code.
    #[must_use]
    pub fn new(original: impl Into<String>, short: u64) -> Self {
        Self {
            original: original.into(),
            short,
        }
    }
}
