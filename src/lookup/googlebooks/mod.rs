//! Google Books integration
//!
//! Fallback catalog, searched with an `isbn:` query when Open Library has
//! no record.
//!
//! API docs: https://developers.google.com/books/docs/v1/using

pub mod dto;
mod adapter;
mod client;
mod source;

pub use client::{GoogleBooksClient, DEFAULT_BASE_URL};
pub use source::GoogleBooksSource;
