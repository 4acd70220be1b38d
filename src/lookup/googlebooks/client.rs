//! Google Books HTTP client
//!
//! Handles communication with the Google Books volumes API.
//! See: https://developers.google.com/books/docs/v1/using
//!
//! Works without an API key at low volume; a key raises the quota.

use super::dto;
use crate::lookup::domain::LookupError;

/// Google Books API client
pub struct GoogleBooksClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/books/v1";

impl GoogleBooksClient {
    /// Create a client with a specific HTTP client, base URL and optional key
    pub fn with_client(
        http_client: reqwest::Client,
        base_url: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// Build the search URL for a query such as `isbn:9780140328721`
    fn search_url(&self, query: &str) -> String {
        let mut url = format!(
            "{}/volumes?q={}",
            self.base_url,
            urlencoding::encode(query)
        );
        if let Some(ref key) = self.api_key {
            url.push_str("&key=");
            url.push_str(&urlencoding::encode(key));
        }
        url
    }

    /// Search volumes
    pub async fn search_volumes(&self, query: &str) -> Result<dto::VolumesResponse, LookupError> {
        let url = self.search_url(query);
        tracing::debug!(target: "lookup::googlebooks", query, "GET volumes");

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(LookupError::from_transport)?;

        let status = response.status();

        if !status.is_success() {
            return Err(LookupError::from_status(status));
        }

        // A body read that times out must stay a timeout, not a parse error
        response
            .json::<dto::VolumesResponse>()
            .await
            .map_err(LookupError::from_transport)
    }
}
