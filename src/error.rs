//! Application-wide error types.
//!
//! Subsystems carry their own `thiserror` enums
//! ([`LookupError`](crate::lookup::LookupError),
//! [`ScanError`](crate::scanner::ScanError),
//! [`ConfigError`](crate::config::ConfigError)); this one covers input
//! validation shared across commands. The CLI and `main` use `anyhow` for
//! propagation.
//!
//! # Example
//!
//! ```ignore
//! use scanbook::error::Result;
//!
//! fn prepare(input: &str) -> Result<String> {
//!     let isbn = model::isbn::normalize(input)?;
//!     Ok(isbn)
//! }
//! ```

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level application error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Input that is not shaped like an ISBN
    #[error("Invalid ISBN: {0:?}")]
    InvalidIsbn(String),
}
