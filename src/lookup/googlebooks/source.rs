//! Google Books as a [`BookLookup`] source.

use async_trait::async_trait;

use super::{adapter, GoogleBooksClient};
use crate::lookup::domain::{CatalogKind, LookupError, LookupOutcome};
use crate::lookup::traits::{BookLookup, GoogleBooksApi};

/// Google Books lookup source, used as the fallback catalog
pub struct GoogleBooksSource<A = GoogleBooksClient> {
    api: A,
}

impl<A: GoogleBooksApi> GoogleBooksSource<A> {
    /// Source backed by any API implementation
    pub fn with_api(api: A) -> Self {
        Self { api }
    }
}

#[async_trait]
impl<A: GoogleBooksApi> BookLookup for GoogleBooksSource<A> {
    fn name(&self) -> &str {
        CatalogKind::GoogleBooks.name()
    }

    async fn lookup(&self, isbn: &str) -> LookupOutcome {
        let response = self.api.search_volumes(&format!("isbn:{isbn}")).await?;

        let Some(volume) = adapter::first_volume(response) else {
            return Err(LookupError::not_found(isbn));
        };

        Ok(adapter::to_scanned_isbn(isbn, volume))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::googlebooks::dto::{ImageLinks, Volume, VolumeInfo, VolumesResponse};
    use crate::lookup::traits::mocks::MockGoogleBooks;

    const ISBN: &str = "9780140328721";

    fn single(info: VolumeInfo) -> VolumesResponse {
        VolumesResponse {
            total_items: 1,
            items: Some(vec![Volume {
                id: "abc123".to_string(),
                volume_info: info,
            }]),
        }
    }

    #[tokio::test]
    async fn test_lookup_success_maps_all_fields() {
        let api = MockGoogleBooks::with_response(single(VolumeInfo {
            title: Some("Fantastic Mr. Fox".to_string()),
            authors: Some(vec!["Roald Dahl".to_string()]),
            publisher: Some("Puffin".to_string()),
            published_date: Some("1988".to_string()),
            image_links: Some(ImageLinks {
                small_thumbnail: Some("http://books.google.com/small.jpg".to_string()),
                thumbnail: Some("http://books.google.com/thumb.jpg".to_string()),
            }),
            categories: Some(vec!["Fiction".to_string(), "Children".to_string()]),
        }));
        let source = GoogleBooksSource::with_api(api);

        let book = source.lookup(ISBN).await.unwrap();

        assert_eq!(book.isbn, ISBN);
        assert_eq!(book.title.as_deref(), Some("Fantastic Mr. Fox"));
        assert_eq!(book.author.as_deref(), Some("Roald Dahl"));
        assert_eq!(book.genre.as_deref(), Some("Fiction"));
        assert_eq!(
            book.cover_url.as_deref(),
            Some("https://books.google.com/thumb.jpg")
        );
        assert_eq!(book.publisher.as_deref(), Some("Puffin"));
    }

    #[tokio::test]
    async fn test_multiple_authors_joined() {
        let api = MockGoogleBooks::with_response(single(VolumeInfo {
            title: Some("Coauthored Book".to_string()),
            authors: Some(vec![
                "Author One".to_string(),
                "Author Two".to_string(),
                "Author Three".to_string(),
            ]),
            ..Default::default()
        }));
        let source = GoogleBooksSource::with_api(api);

        let book = source.lookup(ISBN).await.unwrap();

        assert_eq!(
            book.author.as_deref(),
            Some("Author One, Author Two, Author Three")
        );
    }

    #[tokio::test]
    async fn test_zero_total_items_is_not_found() {
        let api = MockGoogleBooks::with_response(VolumesResponse {
            total_items: 0,
            items: None,
        });
        let source = GoogleBooksSource::with_api(api);

        assert_eq!(
            source.lookup(ISBN).await.unwrap_err(),
            LookupError::not_found(ISBN)
        );
    }

    #[tokio::test]
    async fn test_empty_items_is_not_found() {
        let api = MockGoogleBooks::with_response(VolumesResponse {
            total_items: 1,
            items: Some(vec![]),
        });
        let source = GoogleBooksSource::with_api(api);

        assert!(source.lookup(ISBN).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_api_error_is_propagated() {
        let api = MockGoogleBooks::with_error(LookupError::Timeout("15s".to_string()));
        let source = GoogleBooksSource::with_api(api);

        let err = source.lookup(ISBN).await.unwrap_err();

        assert!(matches!(err, LookupError::Timeout(_)));
    }

    #[tokio::test]
    async fn test_queries_with_isbn_prefix() {
        let api = MockGoogleBooks::with_response(VolumesResponse::default());
        let source = GoogleBooksSource::with_api(api);

        let _ = source.lookup(ISBN).await;

        assert_eq!(
            source.api.queries.lock().as_slice(),
            ["isbn:9780140328721"]
        );
    }
}
