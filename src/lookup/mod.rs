//! Book lookup - resolves an ISBN to metadata from external catalogs.
//!
//! # Architecture
//!
//! This module follows a clean separation between:
//! - **Domain types** (`domain.rs`) - [`LookupError`], [`LookupOutcome`], [`CatalogKind`]
//! - **API DTOs** (`openlibrary/dto.rs`, `googlebooks/dto.rs`) - Exact API response shapes
//! - **Adapters** - Convert DTOs to [`ScannedIsbn`](crate::model::ScannedIsbn)
//! - **Clients** - HTTP clients for the catalogs, sharing one `reqwest::Client`
//! - **Sources** - One [`BookLookup`] per catalog, built on the API traits
//! - **Composite** - Ordered fallback across sources
//!
//! # Usage
//!
//! ```ignore
//! use scanbook::lookup::{BookLookup, CompositeLookup};
//!
//! let resolver = CompositeLookup::from_config(&config.catalogs);
//! match resolver.lookup("9780140328721").await {
//!     Ok(book) => println!("Title: {:?}, Author: {:?}", book.title, book.author),
//!     Err(e) if e.is_not_found() => println!("No catalog knows this book"),
//!     Err(e) => eprintln!("Lookup failed: {e}"),
//! }
//! ```

pub mod composite;
pub mod domain;
pub mod googlebooks;
pub mod http;
pub mod openlibrary;
pub mod traits;

pub use composite::CompositeLookup;
pub use domain::{CatalogKind, LookupError, LookupOutcome};
pub use googlebooks::GoogleBooksSource;
pub use openlibrary::{CoverSize, OpenLibrarySource};
pub use traits::BookLookup;
