//! Scanbook - book barcode scanning and ISBN lookup.
//!
//! This application detects ISBN barcodes in a stream of recognized frames,
//! resolves them against Open Library and Google Books, and tracks the
//! loading/success/error state of each result. It is driven through CLI
//! commands.

pub mod cli;
pub mod config;
pub mod error;
pub mod lookup;
pub mod model;
pub mod result_state;
pub mod scanner;
#[cfg(test)]
pub mod test_utils;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Filter used when `RUST_LOG` is unset or invalid
const DEFAULT_LOG_FILTER: &str =
    "scanbook=info,cli=info,lookup=info,result_state=info,scanner=info";

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging (stderr, so command output stays clean on stdout)
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(log_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref()))
        .init();

    cli::run_command(&args)
}

/// `RUST_LOG` when set and valid, otherwise `info` for the crate's log targets
fn log_filter(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_rust_log() {
        let rendered = log_filter(None).to_string();
        for target in ["scanbook", "cli", "lookup", "result_state", "scanner"] {
            assert!(rendered.contains(&format!("{target}=info")), "{rendered}");
        }
    }

    #[test]
    fn test_rust_log_is_not_downgraded() {
        assert_eq!(log_filter(Some("lookup=debug")).to_string(), "lookup=debug");
    }

    #[test]
    fn test_invalid_rust_log_falls_back_to_defaults() {
        let rendered = log_filter(Some("lookup=loud")).to_string();
        assert!(rendered.contains("scanbook=info"), "{rendered}");
    }
}
