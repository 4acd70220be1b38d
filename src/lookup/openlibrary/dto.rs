//! Open Library API Data Transfer Objects
//!
//! These types match EXACTLY what the Open Library API returns.
//! DO NOT add fields that aren't in the API response.
//! DO NOT use these types outside the lookup module - convert to domain types.
//!
//! API Reference: https://openlibrary.org/dev/docs/api/books
//!
//! Example `/isbn/9780140328721.json` response (trimmed):
//! ```json
//! {
//!   "title": "Fantastic Mr. Fox",
//!   "authors": [{"key": "/authors/OL34184A"}],
//!   "publishers": ["Puffin"],
//!   "publish_date": "October 1, 1988",
//!   "covers": [8739161],
//!   "subjects": ["Animals", "Foxes"]
//! }
//! ```

use serde::{Deserialize, Serialize};

/// Edition record returned by `/isbn/{isbn}.json`
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct BookResponse {
    pub title: Option<String>,
    /// References to author records (names need a second request)
    #[serde(default)]
    pub authors: Vec<AuthorRef>,
    #[serde(default)]
    pub publishers: Vec<String>,
    pub publish_date: Option<String>,
    /// Cover image IDs
    #[serde(default)]
    pub covers: Vec<i64>,
    #[serde(default)]
    pub subjects: Vec<String>,
}

/// Reference to an author record, e.g. `{"key": "/authors/OL34184A"}`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AuthorRef {
    pub key: String,
}

/// Author record returned by `/authors/{id}.json`
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct AuthorResponse {
    pub name: Option<String>,
    pub personal_name: Option<String>,
}

// ============================================================================
// CONTRACT TESTS
// These verify our DTOs match what the real API returns.
// If these fail, the API has changed and we need to update our DTOs.
// ============================================================================
