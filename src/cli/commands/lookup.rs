//! ISBN lookup command.

use std::sync::Arc;
use tokio::runtime::Runtime;
use tracing::{info, warn};

use crate::config::Config;
use crate::lookup::{BookLookup, CatalogKind, CompositeLookup};
use crate::model::isbn;
use crate::result_state::{ResultStatus, ScanResultModel, ScanResultState};

use super::print_book;

/// Look up one ISBN and print the result
pub fn cmd_lookup(
    rt: &Runtime,
    config: &Config,
    raw_isbn: &str,
    sources: &[CatalogKind],
    retries: u32,
) -> anyhow::Result<()> {
    let isbn = isbn::normalize(raw_isbn)?;
    if !isbn::checksum_valid(&isbn) {
        warn!(target: "cli::lookup", %isbn, "Check digit does not match, looking up anyway");
    }

    let mut catalogs = config.catalogs.clone();
    if !sources.is_empty() {
        catalogs.order = sources.to_vec();
    }
    let resolver = CompositeLookup::from_config(&catalogs);
    info!(target: "cli::lookup", %isbn, sources = ?resolver.source_names(), "Looking up");

    println!("Looking up {}...", isbn);
    let resolver: Arc<dyn BookLookup> = Arc::new(resolver);
    let state = rt.block_on(resolve(isbn, resolver, retries));

    match state.status() {
        ResultStatus::Success => {
            println!();
            print_book(&state.scanned);
            Ok(())
        }
        _ => {
            let message = state.error.as_deref().unwrap_or("Could not fetch book data");
            anyhow::bail!("{}", message)
        }
    }
}

/// Drive a result model until it succeeds or runs out of retries
async fn resolve(isbn: String, resolver: Arc<dyn BookLookup>, retries: u32) -> ScanResultState {
    let model = ScanResultModel::new(isbn, resolver);
    let mut state = model.wait_settled().await;

    for attempt in 1..=retries {
        if state.status() != ResultStatus::Error {
            break;
        }
        warn!(
            target: "cli::lookup",
            attempt,
            error = state.error.as_deref().unwrap_or_default(),
            "Lookup failed, retrying"
        );
        model.retry();
        state = model.wait_settled().await;
    }

    state
}
