//! Shared HTTP client for catalog requests.
//!
//! One process-wide `reqwest::Client` is built lazily on first use and never
//! torn down. Clones share the same connection pool.

use std::sync::OnceLock;
use std::time::Duration;

/// Connect and total request timeout used by the shared client
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// User agent string sent to every catalog
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

static SHARED: OnceLock<reqwest::Client> = OnceLock::new();

/// The process-wide client with [`DEFAULT_TIMEOUT`].
pub fn shared() -> reqwest::Client {
    SHARED.get_or_init(|| build(DEFAULT_TIMEOUT)).clone()
}

/// A client with a custom timeout. Returns the shared one for the default.
pub fn with_timeout(timeout: Duration) -> reqwest::Client {
    if timeout == DEFAULT_TIMEOUT {
        shared()
    } else {
        build(timeout)
    }
}

fn build(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .gzip(true)
        .user_agent(USER_AGENT)
        .connect_timeout(timeout)
        .timeout(timeout)
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!(target: "lookup::http", "Falling back to default HTTP client: {}", e);
            reqwest::Client::new()
        })
}
