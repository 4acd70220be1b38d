//! Command-line interface for scanbook.
//!
//! This module provides CLI commands for looking up books, replaying
//! barcode scans and managing the config file.

mod commands;

pub use commands::{Cli, Commands, ConfigAction, run_command};
