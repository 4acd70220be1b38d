//! Open Library as a [`BookLookup`] source.
//!
//! One request for the edition, then one per referenced author. Author
//! requests may fail without failing the lookup.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{adapter, OpenLibraryClient};
use crate::lookup::domain::{CatalogKind, LookupError, LookupOutcome};
use crate::lookup::traits::{BookLookup, OpenLibraryApi};

/// Default cover image service base URL
pub const DEFAULT_COVERS_URL: &str = "https://covers.openlibrary.org";

/// Cover image size served by the covers API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverSize {
    Small,
    Medium,
    /// Default, what the result screen shows
    #[default]
    Large,
}

impl CoverSize {
    fn suffix(self) -> &'static str {
        match self {
            CoverSize::Small => "-S.jpg",
            CoverSize::Medium => "-M.jpg",
            CoverSize::Large => "-L.jpg",
        }
    }
}

/// Open Library lookup source
pub struct OpenLibrarySource<A = OpenLibraryClient> {
    api: A,
    covers_base_url: String,
    cover_size: CoverSize,
}

impl<A: OpenLibraryApi> OpenLibrarySource<A> {
    /// Source backed by any API implementation
    pub fn with_api(api: A) -> Self {
        Self {
            api,
            covers_base_url: DEFAULT_COVERS_URL.to_string(),
            cover_size: CoverSize::default(),
        }
    }

    /// Override where cover URLs point
    pub fn covers(mut self, base_url: impl Into<String>, size: CoverSize) -> Self {
        self.covers_base_url = base_url.into().trim_end_matches('/').to_string();
        self.cover_size = size;
        self
    }

    /// Cover URL for an ISBN, synthesized without a request
    pub fn cover_url(&self, isbn: &str) -> String {
        format!(
            "{}/b/isbn/{}{}",
            self.covers_base_url,
            isbn,
            self.cover_size.suffix()
        )
    }

    /// Resolve one author reference, `None` on any failure
    async fn fetch_author_name(&self, key: &str) -> Option<String> {
        let clean_key = adapter::clean_author_key(key);
        match self.api.get_author(clean_key).await {
            Ok(author) => adapter::author_name(author),
            Err(e) => {
                tracing::warn!(
                    target: "lookup::openlibrary",
                    key = clean_key,
                    "Author lookup failed: {}",
                    e,
                );
                None
            }
        }
    }
}

#[async_trait]
impl<A: OpenLibraryApi> BookLookup for OpenLibrarySource<A> {
    fn name(&self) -> &str {
        CatalogKind::OpenLibrary.name()
    }

    async fn lookup(&self, isbn: &str) -> LookupOutcome {
        let book = self.api.get_book(isbn).await?;

        if adapter::is_empty_record(&book) {
            return Err(LookupError::not_found(isbn));
        }

        let mut names = Vec::with_capacity(book.authors.len());
        for author in &book.authors {
            names.push(self.fetch_author_name(&author.key).await);
        }

        let cover_url = self.cover_url(isbn);
        Ok(adapter::to_scanned_isbn(
            isbn,
            book,
            adapter::join_authors(names),
            cover_url,
        ))
    }
}
