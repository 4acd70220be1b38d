//! Open Library HTTP client
//!
//! Handles communication with the Open Library web service.
//! See: https://openlibrary.org/developers/api
//!
//! No API key required. Edition lookups return 404 for unknown ISBNs
//! (after a redirect to the edition record for known ones).

use super::dto;
use crate::lookup::domain::LookupError;

/// Open Library API client
pub struct OpenLibraryClient {
    http_client: reqwest::Client,
    base_url: String,
}

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://openlibrary.org";

impl OpenLibraryClient {
    /// Create a client with a specific HTTP client and base URL
    pub fn with_client(http_client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Fetch an edition record by ISBN
    pub async fn get_book(&self, isbn: &str) -> Result<dto::BookResponse, LookupError> {
        let url = format!("{}/isbn/{}.json", self.base_url, urlencoding::encode(isbn));
        self.get_json(&url, || LookupError::not_found(isbn)).await
    }

    /// Fetch an author record by its key (without leading slash)
    pub async fn get_author(&self, author_key: &str) -> Result<dto::AuthorResponse, LookupError> {
        // The key already contains the path, e.g. "authors/OL34184A"
        let url = format!("{}/{}.json", self.base_url, author_key);
        self.get_json(&url, || LookupError::not_found(author_key)).await
    }

    /// Send a GET request and parse the JSON body
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        not_found: impl FnOnce() -> LookupError,
    ) -> Result<T, LookupError> {
        tracing::debug!(target: "lookup::openlibrary", url, "GET");

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(LookupError::from_transport)?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(not_found());
        }

        if !status.is_success() {
            return Err(LookupError::from_status(status));
        }

        // A body read that times out must stay a timeout, not a parse error
        response.json::<T>().await.map_err(LookupError::from_transport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::test_utils::{refused_url, respond_with, stall_body};
    use std::time::Duration;

    const ISBN: &str = "9780140328721";

    fn client(base_url: &str) -> OpenLibraryClient {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_millis(500))
            .build()
            .unwrap();
        OpenLibraryClient::with_client(http_client, base_url)
    }

    #[test]
    fn test_client_with_custom_url_trims_slash() {
        let client =
            OpenLibraryClient::with_client(reqwest::Client::new(), "http://localhost:8080/");
        assert_eq!(client.base_url, "http://localhost:8080");
    }

    #[tokio::test]
    async fn test_get_book_parses_edition() {
        let body = r#"{"title": "Fantastic Mr Fox", "authors": [{"key": "/authors/OL34184A"}]}"#;
        let (base_url, requests) = respond_with(200, body);

        let book = client(&base_url).get_book(ISBN).await.unwrap();

        assert_eq!(book.title.as_deref(), Some("Fantastic Mr Fox"));
        assert_eq!(requests.recv().unwrap(), "GET /isbn/9780140328721.json HTTP/1.1");
    }

    #[tokio::test]
    async fn test_get_author_uses_key_path() {
        let (base_url, requests) = respond_with(200, r#"{"name": "Roald Dahl"}"#);

        let author = client(&base_url).get_author("authors/OL34184A").await.unwrap();

        assert_eq!(author.name.as_deref(), Some("Roald Dahl"));
        assert_eq!(requests.recv().unwrap(), "GET /authors/OL34184A.json HTTP/1.1");
    }

    #[tokio::test]
    async fn test_missing_edition_is_not_found() {
        let (base_url, _requests) = respond_with(404, r#"{"error": "notfound"}"#);
        assert_eq!(
            client(&base_url).get_book(ISBN).await,
            Err(LookupError::not_found(ISBN))
        );
    }

    #[tokio::test]
    async fn test_rate_limit_status() {
        let (base_url, _requests) = respond_with(429, "{}");
        assert_eq!(client(&base_url).get_book(ISBN).await, Err(LookupError::RateLimited));
    }

    #[tokio::test]
    async fn test_server_error_status() {
        let (base_url, _requests) = respond_with(500, "{}");
        let err = client(&base_url).get_book(ISBN).await.unwrap_err();
        assert!(matches!(err, LookupError::Http { status: 500, .. }), "{err:?}");
    }

    #[tokio::test]
    async fn test_malformed_body_is_parse_error() {
        let (base_url, _requests) = respond_with(200, "not json");
        let err = client(&base_url).get_book(ISBN).await.unwrap_err();
        assert!(matches!(err, LookupError::Parse(_)), "{err:?}");
    }

    #[tokio::test]
    async fn test_stalled_body_is_timeout() {
        let base_url = stall_body();

        let err = client(&base_url).get_book(ISBN).await.unwrap_err();

        assert!(matches!(err, LookupError::Timeout(_)), "{err:?}");
        assert_eq!(crate::result_state::user_message(&err), "Request timed out");
    }

    #[tokio::test]
    async fn test_refused_connection_is_connectivity() {
        let err = client(&refused_url()).get_book(ISBN).await.unwrap_err();
        assert!(matches!(err, LookupError::Connectivity(_)), "{err:?}");
    }
}
