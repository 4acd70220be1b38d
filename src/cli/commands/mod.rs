//! CLI command definitions and dispatch.
//!
//! Each subcommand is implemented in its own submodule:
//! - `lookup`: Resolve an ISBN against the configured catalogs
//! - `scan`: Replay recorded frames through the barcode pipeline
//! - `check`: Validate an ISBN offline
//! - `config`: Inspect or create the config file

mod check;
mod config;
mod lookup;
mod scan;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tokio::runtime::Runtime;

use crate::config::Config;
use crate::lookup::CatalogKind;
use crate::model::ScannedIsbn;

pub use check::cmd_check;
pub use config::{cmd_config_init, cmd_config_path, cmd_config_show};
pub use lookup::cmd_lookup;
pub use scan::{cmd_scan, ScanOptions};

/// Scanbook CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Look up book metadata for an ISBN
    Lookup {
        /// ISBN-13 or ISBN-10 (hyphens allowed)
        isbn: String,
        /// Catalog to query, repeatable; order matters (default: from config)
        #[arg(long = "source", value_parser = parse_catalog)]
        sources: Vec<CatalogKind>,
        /// Retry this many times on failure
        #[arg(long, default_value = "0")]
        retries: u32,
        /// Google Books API key (or set GOOGLE_BOOKS_API_KEY env var)
        #[arg(long, env = "GOOGLE_BOOKS_API_KEY", hide_env_values = true)]
        api_key: Option<String>,
    },
    /// Detect ISBN barcodes in recorded frames
    Scan {
        /// Frame file, one frame of FORMAT:value tokens per line (default: stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Look up each detected ISBN
        #[arg(long)]
        lookup: bool,
        /// Accept any EAN-13, not only 978/979 book codes
        #[arg(long)]
        no_strict: bool,
        /// Also accept EAN-8 codes (with --no-strict)
        #[arg(long)]
        ean8: bool,
        /// Reject codes with a wrong ISBN-13 check digit
        #[arg(long)]
        verify_checksum: bool,
        /// Don't ring the terminal bell on detection
        #[arg(long)]
        no_beep: bool,
        /// Light the camera torch while scanning
        #[arg(long)]
        torch: bool,
        /// Delay between frames in milliseconds (default: from config)
        #[arg(long)]
        frame_interval_ms: Option<u64>,
        /// Google Books API key (or set GOOGLE_BOOKS_API_KEY env var)
        #[arg(long, env = "GOOGLE_BOOKS_API_KEY", hide_env_values = true)]
        api_key: Option<String>,
    },
    /// Validate an ISBN without going online
    Check {
        /// ISBN-13 or ISBN-10 (hyphens allowed)
        isbn: String,
    },
    /// Manage the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// `config` subcommands
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the config file location
    Path,
    /// Print the effective configuration
    Show,
    /// Write a config file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Run the specified CLI command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let config_path = cli.config.as_deref();

    match &cli.command {
        Commands::Lookup {
            isbn,
            sources,
            retries,
            api_key,
        } => {
            let rt = Runtime::new()?;
            let config = with_api_key(load_config(config_path), api_key.as_deref());
            cmd_lookup(&rt, &config, isbn, sources, *retries)
        }
        Commands::Scan {
            input,
            lookup,
            no_strict,
            ean8,
            verify_checksum,
            no_beep,
            torch,
            frame_interval_ms,
            api_key,
        } => {
            let rt = Runtime::new()?;
            let config = with_api_key(load_config(config_path), api_key.as_deref());
            let options = ScanOptions {
                input: input.clone(),
                lookup: *lookup,
                no_strict: *no_strict,
                ean8: *ean8,
                verify_checksum: *verify_checksum,
                no_beep: *no_beep,
                torch: *torch,
                frame_interval_ms: *frame_interval_ms,
            };
            cmd_scan(&rt, &config, &options).map(|_| ())
        }
        Commands::Check { isbn } => cmd_check(isbn),
        Commands::Config { action } => match action {
            ConfigAction::Path => cmd_config_path(config_path),
            ConfigAction::Show => cmd_config_show(&load_config(config_path)),
            ConfigAction::Init { force } => cmd_config_init(config_path, *force),
        },
    }
}

// ============================================================================
// Shared helper functions
// ============================================================================

/// Load the config from `--config` or the default location
pub(crate) fn load_config(path: Option<&Path>) -> Config {
    match path {
        Some(path) => crate::config::load_from(path),
        None => crate::config::load(),
    }
}

/// A key given on the command line (or env) wins over the config file
fn with_api_key(mut config: Config, api_key: Option<&str>) -> Config {
    if let Some(key) = api_key {
        config.catalogs.google_books_api_key = Some(key.to_string());
    }
    config
}

/// Parse a `--source` value
fn parse_catalog(value: &str) -> Result<CatalogKind, String> {
    match value.to_ascii_lowercase().as_str() {
        "open-library" | "openlibrary" | "ol" => Ok(CatalogKind::OpenLibrary),
        "google-books" | "googlebooks" | "google" | "gb" => Ok(CatalogKind::GoogleBooks),
        _ => Err(format!(
            "unknown catalog {value:?} (expected open-library or google-books)"
        )),
    }
}

/// Print a book record, skipping empty fields
pub(crate) fn print_book(book: &ScannedIsbn) {
    println!("  ISBN:      {}", book.isbn);
    let fields = [
        ("Title", &book.title),
        ("Author", &book.author),
        ("Genre", &book.genre),
        ("Publisher", &book.publisher),
        ("Published", &book.published_date),
        ("Condition", &book.condition),
        ("Cover", &book.cover_url),
    ];
    for (label, value) in fields {
        if let Some(value) = value {
            println!("  {:<10} {}", format!("{label}:"), value);
        }
    }
    if let Some(price) = book.price {
        println!("  Price:     {price:.2}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_lookup_sources_in_order() {
        let cli = Cli::try_parse_from([
            "scanbook",
            "lookup",
            "978-0-14-032872-1",
            "--source",
            "google-books",
            "--source",
            "open-library",
            "--retries",
            "2",
        ])
        .unwrap();

        match cli.command {
            Commands::Lookup {
                isbn,
                sources,
                retries,
                ..
            } => {
                assert_eq!(isbn, "978-0-14-032872-1");
                assert_eq!(sources, vec![CatalogKind::GoogleBooks, CatalogKind::OpenLibrary]);
                assert_eq!(retries, 2);
            }
            _ => panic!("expected lookup"),
        }
    }

    #[test]
    fn test_unknown_source_is_rejected() {
        assert!(Cli::try_parse_from(["scanbook", "lookup", "9780140328721", "--source", "amazon"])
            .is_err());
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::try_parse_from(["scanbook", "config", "show", "--config", "/tmp/x.toml"])
            .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/x.toml")));
    }

    #[test]
    fn test_api_key_overrides_config() {
        let config = with_api_key(Config::default(), Some("cli-key"));
        assert_eq!(config.catalogs.google_books_api_key.as_deref(), Some("cli-key"));

        let mut from_file = Config::default();
        from_file.catalogs.google_books_api_key = Some("file-key".to_string());
        let config = with_api_key(from_file, None);
        assert_eq!(config.catalogs.google_books_api_key.as_deref(), Some("file-key"));
    }
}
