//! Core data models for scanned books.
//!
//! Defines [`ScannedIsbn`], the record a scan produces and lookups fill in,
//! and the [`isbn`] helpers used to normalize and validate codes.

pub mod isbn;

/// A scanned book, identified by its ISBN.
///
/// Only `isbn` is known at scan time. Catalog lookups fill in the rest,
/// and `price`/`condition` are entered by the user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScannedIsbn {
    /// Canonical identifier (ISBN-13 or ISBN-10 digits)
    pub isbn: String,
    /// Book title
    pub title: Option<String>,
    /// Author names, joined with ", "
    pub author: Option<String>,
    /// First genre/category reported by the catalog
    pub genre: Option<String>,
    /// Asking price (user-entered)
    pub price: Option<f64>,
    /// Physical condition (user-entered)
    pub condition: Option<String>,
    /// HTTPS cover image URL
    pub cover_url: Option<String>,
    /// Publisher name
    pub publisher: Option<String>,
    /// Publication date as reported by the catalog (free-form)
    pub published_date: Option<String>,
}

impl ScannedIsbn {
    /// Create a record with only the ISBN known.
    pub fn new(isbn: impl Into<String>) -> Self {
        Self {
            isbn: isbn.into(),
            ..Default::default()
        }
    }

    /// Merge a lookup result into this record.
    ///
    /// Values present in `found` win; absent ones keep what we already have.
    /// The ISBN never changes.
    pub fn merge(&mut self, found: &ScannedIsbn) {
        fn take(slot: &mut Option<String>, value: &Option<String>) {
            if value.is_some() {
                slot.clone_from(value);
            }
        }

        take(&mut self.title, &found.title);
        take(&mut self.author, &found.author);
        take(&mut self.genre, &found.genre);
        take(&mut self.condition, &found.condition);
        take(&mut self.cover_url, &found.cover_url);
        take(&mut self.publisher, &found.publisher);
        take(&mut self.published_date, &found.published_date);
        if found.price.is_some() {
            self.price = found.price;
        }
    }
}
