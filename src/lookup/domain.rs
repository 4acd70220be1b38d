//! Internal domain types for book lookup.
//!
//! These types are OUR types - they don't change when catalog APIs change.
//! All catalog responses get converted into [`ScannedIsbn`] via adapters.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::ScannedIsbn;

/// Outcome of looking up one ISBN in one catalog.
///
/// `Err(LookupError::NotFound { .. })` means "try the next catalog";
/// every other error means "stop and report".
pub type LookupOutcome = Result<ScannedIsbn, LookupError>;

/// External catalogs we know how to query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CatalogKind {
    OpenLibrary,
    GoogleBooks,
}

impl CatalogKind {
    /// Short human-readable name, also used as the source name in logs
    pub fn name(self) -> &'static str {
        match self {
            CatalogKind::OpenLibrary => "Open Library",
            CatalogKind::GoogleBooks => "Google Books",
        }
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors that can occur during a lookup
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LookupError {
    #[error("Book not found for ISBN: {isbn}")]
    NotFound { isbn: String },

    #[error("No connection: {0}")]
    Connectivity(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Rate limited - try again later")]
    RateLimited,

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Network error: {0}")]
    Network(String),
}

impl LookupError {
    /// Create a not-found error for an ISBN.
    pub fn not_found(isbn: impl Into<String>) -> Self {
        Self::NotFound { isbn: isbn.into() }
    }

    /// Whether the next catalog should be tried.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Classify a transport failure from reqwest.
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::Connectivity(err.to_string())
        } else if err.is_decode() {
            Self::Parse(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }

    /// Classify a non-success HTTP status.
    pub fn from_status(status: reqwest::StatusCode) -> Self {
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Self::RateLimited;
        }
        Self::Http {
            status: status.as_u16(),
            message: status.canonical_reason().unwrap_or("Unknown").to_string(),
        }
    }
}

/// Upgrade an `http://` URL to `https://`. Other URLs pass through.
pub fn upgrade_to_https(url: &str) -> String {
    match url.strip_prefix("http://") {
        Some(rest) => format!("https://{rest}"),
        None => url.to_string(),
    }
}
