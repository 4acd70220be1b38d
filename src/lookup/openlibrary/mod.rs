//! Open Library integration
//!
//! Primary catalog. Looks up editions by ISBN and resolves author names
//! with follow-up requests.
//!
//! API docs: https://openlibrary.org/developers/api

pub mod dto;
mod adapter;
mod client;
mod source;

pub use client::{OpenLibraryClient, DEFAULT_BASE_URL};
pub use source::{CoverSize, OpenLibrarySource, DEFAULT_COVERS_URL};
