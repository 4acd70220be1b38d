//! Result state for one scanned ISBN.
//!
//! [`ScanResultModel`] owns the state of a single scan result and drives its
//! loading/success/error transitions. Views observe it through a
//! `tokio::sync::watch` receiver; the model is the only writer.
//!
//! At most one lookup is in flight per model. `retry()` aborts the previous
//! task, and every task carries a generation number that must still be
//! current when it completes, so an older lookup can never overwrite the
//! state of a newer one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::lookup::{BookLookup, LookupError};
use crate::model::ScannedIsbn;

/// What a view renders for a scanned ISBN.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanResultState {
    pub scanned: ScannedIsbn,
    pub is_loading: bool,
    pub error: Option<String>,
}

/// Coarse view of [`ScanResultState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultStatus {
    Loading,
    Success,
    Error,
}

impl ScanResultState {
    /// Only the ISBN is known; a lookup is about to start.
    pub fn initial(isbn: impl Into<String>) -> Self {
        Self {
            scanned: ScannedIsbn::new(isbn),
            is_loading: true,
            error: None,
        }
    }

    pub fn status(&self) -> ResultStatus {
        if self.is_loading {
            ResultStatus::Loading
        } else if self.error.is_some() {
            ResultStatus::Error
        } else {
            ResultStatus::Success
        }
    }

    fn apply(&mut self, outcome: Result<ScannedIsbn, LookupError>) {
        self.is_loading = false;
        match outcome {
            Ok(found) => {
                self.scanned.merge(&found);
                self.error = None;
            }
            Err(e) => {
                self.error = Some(user_message(&e).to_string());
            }
        }
    }
}

/// Message shown to the user for a failed lookup.
pub fn user_message(err: &LookupError) -> &'static str {
    match err {
        LookupError::NotFound { .. } => "Book not found",
        LookupError::Connectivity(_) => "No internet connection",
        LookupError::Timeout(_) => "Request timed out",
        _ => "Could not fetch book data",
    }
}

/// Drives the state of one scan result.
///
/// Dropping the model aborts any lookup still in flight.
pub struct ScanResultModel {
    isbn: String,
    lookup: Arc<dyn BookLookup>,
    state: Arc<watch::Sender<ScanResultState>>,
    generation: Arc<AtomicU64>,
    in_flight: Mutex<Option<JoinHandle<()>>>,
}

impl ScanResultModel {
    /// Publish the initial state and start looking up `isbn`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(isbn: impl Into<String>, lookup: Arc<dyn BookLookup>) -> Self {
        let isbn = isbn.into();
        let (state, _) = watch::channel(ScanResultState::initial(isbn.clone()));

        let model = Self {
            isbn,
            lookup,
            state: Arc::new(state),
            generation: Arc::new(AtomicU64::new(0)),
            in_flight: Mutex::new(None),
        };
        let generation = model.generation.fetch_add(1, Ordering::SeqCst) + 1;
        model.spawn_lookup(generation);
        model
    }

    pub fn isbn(&self) -> &str {
        &self.isbn
    }

    /// Snapshot of the current state
    pub fn state(&self) -> ScanResultState {
        self.state.borrow().clone()
    }

    /// Observe state changes
    pub fn subscribe(&self) -> watch::Receiver<ScanResultState> {
        self.state.subscribe()
    }

    /// Go back to loading and look the ISBN up again.
    ///
    /// The loading state is visible as soon as this returns. Data from an
    /// earlier successful lookup stays in place until the new one completes.
    pub fn retry(&self) {
        let mut generation = 0;
        self.state.send_modify(|state| {
            state.is_loading = true;
            state.error = None;
            generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        });

        tracing::debug!(target: "result_state", isbn = %self.isbn, generation, "Retrying lookup");
        self.spawn_lookup(generation);
    }

    /// Wait until the current lookup has settled and return that state.
    pub async fn wait_settled(&self) -> ScanResultState {
        let mut rx = self.state.subscribe();
        match rx.wait_for(|state| !state.is_loading).await {
            Ok(state) => state.clone(),
            // Sender lives in self, so this is unreachable while we're borrowed
            Err(_) => self.state(),
        }
    }

    fn spawn_lookup(&self, generation: u64) {
        let isbn = self.isbn.clone();
        let lookup = Arc::clone(&self.lookup);
        let state = Arc::clone(&self.state);
        let current = Arc::clone(&self.generation);

        let task = tokio::spawn(async move {
            let outcome = lookup.lookup(&isbn).await;
            match &outcome {
                Ok(_) => tracing::info!(target: "result_state", %isbn, "Lookup succeeded"),
                Err(e) => tracing::info!(target: "result_state", %isbn, "Lookup failed: {}", e),
            }

            let applied = state.send_if_modified(|s| {
                if current.load(Ordering::SeqCst) != generation {
                    return false;
                }
                s.apply(outcome);
                true
            });
            if !applied {
                tracing::debug!(
                    target: "result_state",
                    %isbn,
                    generation,
                    "Discarding stale lookup result",
                );
            }
        });

        if let Some(previous) = self.in_flight.lock().replace(task) {
            previous.abort();
        }
    }
}

impl Drop for ScanResultModel {
    fn drop(&mut self) {
        if let Some(task) = self.in_flight.lock().take() {
            task.abort();
        }
    }
}
