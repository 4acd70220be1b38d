//! Google Books API Data Transfer Objects
//!
//! These types match EXACTLY what the Google Books API returns.
//! DO NOT add fields that aren't in the API response.
//! DO NOT use these types outside the lookup module - convert to domain types.
//!
//! API Reference: https://developers.google.com/books/docs/v1/using
//!
//! Example `/volumes?q=isbn:9780140328721` response (trimmed):
//! ```json
//! {
//!   "kind": "books#volumes",
//!   "totalItems": 1,
//!   "items": [{
//!     "id": "abc123",
//!     "volumeInfo": {
//!       "title": "Fantastic Mr. Fox",
//!       "authors": ["Roald Dahl"],
//!       "categories": ["Juvenile Fiction"],
//!       "imageLinks": {"thumbnail": "http://books.google.com/..."}
//!     }
//!   }]
//! }
//! ```

use serde::{Deserialize, Serialize};

/// Volume search response
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumesResponse {
    #[serde(default)]
    pub total_items: u32,
    /// Missing entirely when there are no results
    pub items: Option<Vec<Volume>>,
}

/// A single volume (book)
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    pub id: String,
    pub volume_info: VolumeInfo,
}

/// Descriptive volume metadata
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeInfo {
    pub title: Option<String>,
    pub authors: Option<Vec<String>>,
    pub publisher: Option<String>,
    /// YYYY, YYYY-MM or YYYY-MM-DD
    pub published_date: Option<String>,
    pub image_links: Option<ImageLinks>,
    pub categories: Option<Vec<String>>,
}

/// Cover image links (served over http by default)
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageLinks {
    pub small_thumbnail: Option<String>,
    pub thumbnail: Option<String>,
}

// ============================================================================
// CONTRACT TESTS
// ============================================================================
