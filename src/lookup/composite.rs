//! Composite resolver - tries catalogs in order with fallback.
//!
//! Resolution rules:
//! 1. The first source that finds the book wins; later sources are not asked
//! 2. `NotFound` moves on to the next source
//! 3. Any other error stops resolution and is returned unchanged, so a real
//!    outage is never hidden behind a string of fallbacks
//! 4. If every source (or no source) came up empty, the result is `NotFound`
//!    for the requested ISBN

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::domain::{CatalogKind, LookupError, LookupOutcome};
use super::googlebooks::{GoogleBooksClient, GoogleBooksSource};
use super::http;
use super::openlibrary::{OpenLibraryClient, OpenLibrarySource};
use super::traits::BookLookup;
use crate::config::CatalogConfig;

/// Ordered list of lookup sources behaving as one
pub struct CompositeLookup {
    sources: Vec<Arc<dyn BookLookup>>,
}

impl CompositeLookup {
    /// Resolver over the given sources, tried in order
    pub fn new(sources: Vec<Arc<dyn BookLookup>>) -> Self {
        Self { sources }
    }

    /// Build the chain described by the catalog configuration
    pub fn from_config(config: &CatalogConfig) -> Self {
        let client = http::with_timeout(Duration::from_secs(config.timeout_secs));

        let sources = config
            .order
            .iter()
            .map(|kind| -> Arc<dyn BookLookup> {
                match kind {
                    CatalogKind::OpenLibrary => Arc::new(
                        OpenLibrarySource::with_api(OpenLibraryClient::with_client(
                            client.clone(),
                            config.open_library_url.as_str(),
                        ))
                        .covers(config.covers_url.as_str(), config.cover_size),
                    ),
                    CatalogKind::GoogleBooks => {
                        Arc::new(GoogleBooksSource::with_api(GoogleBooksClient::with_client(
                            client.clone(),
                            config.google_books_url.as_str(),
                            config.google_books_api_key.clone(),
                        )))
                    }
                }
            })
            .collect();

        Self::new(sources)
    }

    /// Names of the sources, in lookup order
    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }
}

#[async_trait]
impl BookLookup for CompositeLookup {
    fn name(&self) -> &str {
        "composite"
    }

    async fn lookup(&self, isbn: &str) -> LookupOutcome {
        for source in &self.sources {
            match source.lookup(isbn).await {
                Ok(book) => {
                    tracing::info!(
                        target: "lookup::composite",
                        isbn,
                        source = source.name(),
                        "Book found",
                    );
                    return Ok(book);
                }
                Err(e) if e.is_not_found() => {
                    tracing::debug!(
                        target: "lookup::composite",
                        isbn,
                        source = source.name(),
                        "Not found, trying next source",
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        target: "lookup::composite",
                        isbn,
                        source = source.name(),
                        "Lookup failed: {}",
                        e,
                    );
                    return Err(e);
                }
            }
        }

        Err(LookupError::not_found(isbn))
    }
}


/// Property-based tests using proptest
#[cfg(test)]
mod proptests {
    use super::*;
    use crate::lookup::traits::mocks::{book, MockLookup};
    use proptest::prelude::*;

    const ISBN: &str = "9790000000001";

    #[derive(Debug, Clone, Copy)]
    enum Scripted {
        Found,
        NotFound,
        Failed,
    }

    fn scripted() -> impl Strategy<Value = Scripted> {
        prop_oneof![
            Just(Scripted::Found),
            Just(Scripted::NotFound),
            Just(Scripted::Failed),
        ]
    }

    fn outcome(i: usize, s: Scripted) -> LookupOutcome {
        match s {
            Scripted::Found => Ok(book(ISBN, &format!("from {i}"))),
            Scripted::NotFound => Err(LookupError::not_found(ISBN)),
            Scripted::Failed => Err(LookupError::Network(format!("source {i} down"))),
        }
    }

    proptest! {
        /// The result is the first outcome that is not NotFound, and no
        /// source after it is ever asked
        #[test]
        fn first_decisive_outcome_wins(script in proptest::collection::vec(scripted(), 0..6)) {
            let mocks: Vec<Arc<MockLookup>> = script
                .iter()
                .enumerate()
                .map(|(i, s)| MockLookup::new(&format!("s{i}"), vec![outcome(i, *s)]).shared())
                .collect();
            let resolver = CompositeLookup::new(
                mocks.iter().map(|m| Arc::clone(m) as Arc<dyn BookLookup>).collect(),
            );

            let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let result = rt.block_on(resolver.lookup(ISBN));

            let decisive = script
                .iter()
                .position(|s| !matches!(s, Scripted::NotFound));

            match decisive {
                Some(i) => {
                    prop_assert_eq!(result, outcome(i, script[i]));
                    for (j, mock) in mocks.iter().enumerate() {
                        prop_assert_eq!(mock.call_count(), usize::from(j <= i));
                    }
                }
                None => {
                    prop_assert_eq!(result, Err(LookupError::not_found(ISBN)));
                    for mock in &mocks {
                        prop_assert_eq!(mock.call_count(), 1);
                    }
                }
            }
        }
    }
}
