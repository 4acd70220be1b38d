//! Trait definitions for lookup sources and catalog clients.
//!
//! [`BookLookup`] is the one capability every source shares. The catalog API
//! traits sit one level lower, between a source and its HTTP client, so the
//! mapping and fallback rules can be tested without a network.
//!
//! # Example
//!
//! ```ignore
//! use scanbook::lookup::traits::BookLookup;
//!
//! async fn describe(source: &dyn BookLookup, isbn: &str) {
//!     match source.lookup(isbn).await {
//!         Ok(book) => println!("{:?}", book.title),
//!         Err(e) if e.is_not_found() => println!("not in {}", source.name()),
//!         Err(e) => println!("failed: {e}"),
//!     }
//! }
//! ```

use async_trait::async_trait;

use super::domain::{LookupError, LookupOutcome};
use super::googlebooks::dto::VolumesResponse;
use super::openlibrary::dto::{AuthorResponse, BookResponse};

/// Look up a book by ISBN in one or more catalogs.
#[async_trait]
pub trait BookLookup: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Look up one ISBN.
    async fn lookup(&self, isbn: &str) -> LookupOutcome;
}

/// Raw Open Library endpoints.
#[async_trait]
pub trait OpenLibraryApi: Send + Sync {
    /// `GET /isbn/{isbn}.json`
    async fn get_book(&self, isbn: &str) -> Result<BookResponse, LookupError>;

    /// `GET /{author_key}.json`, key without its leading slash
    async fn get_author(&self, author_key: &str) -> Result<AuthorResponse, LookupError>;
}

/// Raw Google Books endpoints.
#[async_trait]
pub trait GoogleBooksApi: Send + Sync {
    /// `GET /volumes?q={query}`
    async fn search_volumes(&self, query: &str) -> Result<VolumesResponse, LookupError>;
}

// Implement traits for real clients

#[async_trait]
impl OpenLibraryApi for super::openlibrary::OpenLibraryClient {
    async fn get_book(&self, isbn: &str) -> Result<BookResponse, LookupError> {
        self.get_book(isbn).await
    }

    async fn get_author(&self, author_key: &str) -> Result<AuthorResponse, LookupError> {
        self.get_author(author_key).await
    }
}

#[async_trait]
impl GoogleBooksApi for super::googlebooks::GoogleBooksClient {
    async fn search_volumes(&self, query: &str) -> Result<VolumesResponse, LookupError> {
        self.search_volumes(query).await
    }
}
