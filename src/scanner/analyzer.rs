//! Frame analysis thread with keep-latest backpressure.
//!
//! Frames go into a single-slot mailbox. If the analysis thread is still
//! busy with an earlier frame, a newly submitted frame replaces the pending
//! one instead of queueing behind it, so memory stays bounded no matter how
//! slow recognition is.
//!
//! The recognizer and the confirmation (beep) are owned by the analysis
//! thread and dropped when it exits. Stopping the analyzer, explicitly or
//! by dropping it, joins the thread, so both are released before `stop`
//! returns. The torch belongs to the handle: `stop` switches it off and
//! releases it.

use std::io::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use parking_lot::{Condvar, Mutex};

use super::detector::{BarcodeDetector, DetectorConfig};
use super::{DecodedBarcode, ScanError};

/// Detection events buffered before new ones are dropped
const EVENT_CAPACITY: usize = 64;

/// Turns a frame into barcode candidates.
pub trait Recognizer: Send + 'static {
    type Frame: Send + 'static;

    fn recognize(&mut self, frame: &Self::Frame) -> Result<Vec<DecodedBarcode>, ScanError>;
}

/// User-facing confirmation of a new detection (e.g. a beep).
pub trait Confirmation: Send + 'static {
    fn confirm(&mut self, value: &str);
}

/// Rings the terminal bell.
pub struct TerminalBell;

impl Confirmation for TerminalBell {
    fn confirm(&mut self, _value: &str) {
        let mut stderr = std::io::stderr();
        // A missing terminal is not worth failing a scan over
        let _ = stderr.write_all(b"\x07").and_then(|_| stderr.flush());
    }
}

/// No confirmation.
pub struct Silent;

impl Confirmation for Silent {
    fn confirm(&mut self, _value: &str) {}
}

/// Camera flash, lit while scanning in low light.
pub trait Torch: Send + 'static {
    fn set_enabled(&mut self, enabled: bool);
}

/// Reports torch switches on stderr when replaying frames.
pub struct TerminalTorch;

impl Torch for TerminalTorch {
    fn set_enabled(&mut self, enabled: bool) {
        eprintln!("Torch {}", if enabled { "on" } else { "off" });
    }
}

/// For cameras without a flash.
pub struct NoTorch;

impl Torch for NoTorch {
    fn set_enabled(&mut self, _enabled: bool) {}
}

struct TorchState {
    device: Box<dyn Torch>,
    enabled: bool,
}

/// Events emitted by the analysis thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    /// A new book barcode (different from the previous detection)
    Detected(String),
    /// The recognizer failed on a frame; analysis continues
    RecognizerError(String),
}

/// What happened to a submitted frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// Waiting in the empty mailbox
    Queued,
    /// Replaced an older frame that was never analyzed
    Replaced,
    /// The analyzer is stopped; the frame was discarded
    Closed,
}

/// Frame counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub submitted: u64,
    pub dropped: u64,
    pub analyzed: u64,
}

struct MailboxState<F> {
    frame: Option<F>,
    reset: bool,
    closed: bool,
}

struct Shared<F> {
    state: Mutex<MailboxState<F>>,
    ready: Condvar,
    idle: Condvar,
    submitted: AtomicU64,
    dropped: AtomicU64,
    analyzed: AtomicU64,
}

impl<F> Shared<F> {
    /// Refuse further frames and discard the pending one.
    fn close(&self) {
        {
            let mut state = self.state.lock();
            state.closed = true;
            if state.frame.take().is_some() {
                self.dropped.fetch_add(1, Ordering::SeqCst);
            }
        }
        self.ready.notify_all();
        self.idle.notify_all();
    }

    fn settled(&self) -> bool {
        let done = self.analyzed.load(Ordering::SeqCst) + self.dropped.load(Ordering::SeqCst);
        done >= self.submitted.load(Ordering::SeqCst)
    }
}

/// Handle to a running analysis thread.
///
/// Dropping this handle stops the thread and releases its resources.
pub struct FrameAnalyzer<F: Send + 'static> {
    shared: Arc<Shared<F>>,
    worker: Option<JoinHandle<()>>,
    torch: Mutex<TorchState>,
}

impl<F: Send + 'static> FrameAnalyzer<F> {
    /// Start analyzing frames on a dedicated thread.
    ///
    /// Returns the handle and a receiver for scan events.
    pub fn start<R, C>(
        recognizer: R,
        confirmation: C,
        config: DetectorConfig,
    ) -> Result<(Self, Receiver<ScanEvent>), ScanError>
    where
        R: Recognizer<Frame = F>,
        C: Confirmation,
    {
        let (tx, rx) = bounded(EVENT_CAPACITY);
        let shared = Arc::new(Shared {
            state: Mutex::new(MailboxState {
                frame: None,
                reset: false,
                closed: false,
            }),
            ready: Condvar::new(),
            idle: Condvar::new(),
            submitted: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
            analyzed: AtomicU64::new(0),
        });

        let worker_shared = Arc::clone(&shared);
        let detector = BarcodeDetector::new(config);
        let worker = thread::Builder::new()
            .name("frame-analyzer".to_string())
            .spawn(move || run(worker_shared, recognizer, confirmation, detector, tx))?;

        tracing::info!(target: "scanner::analyzer", ?config, "Frame analyzer started");

        Ok((
            Self {
                shared,
                worker: Some(worker),
                torch: Mutex::new(TorchState {
                    device: Box::new(NoTorch),
                    enabled: false,
                }),
            },
            rx,
        ))
    }

    /// Hand a frame to the analysis thread without ever blocking on analysis.
    pub fn submit(&self, frame: F) -> Submission {
        self.shared.submitted.fetch_add(1, Ordering::SeqCst);

        let mut state = self.shared.state.lock();
        if state.closed {
            self.shared.dropped.fetch_add(1, Ordering::SeqCst);
            return Submission::Closed;
        }

        let replaced = state.frame.replace(frame).is_some();
        drop(state);
        self.shared.ready.notify_one();

        if replaced {
            self.shared.dropped.fetch_add(1, Ordering::SeqCst);
            tracing::trace!(target: "scanner::analyzer", "Dropped stale frame");
            Submission::Replaced
        } else {
            Submission::Queued
        }
    }

    /// Give the analyzer control of a torch, switched off until asked.
    pub fn with_torch(self, torch: impl Torch) -> Self {
        *self.torch.lock() = TorchState {
            device: Box::new(torch),
            enabled: false,
        };
        self
    }

    /// Switch the torch. Ignored once the analyzer is stopped.
    pub fn set_torch(&self, enabled: bool) -> bool {
        if self.shared.state.lock().closed {
            return false;
        }
        let mut torch = self.torch.lock();
        if torch.enabled != enabled {
            torch.device.set_enabled(enabled);
            torch.enabled = enabled;
        }
        true
    }

    pub fn torch_enabled(&self) -> bool {
        self.torch.lock().enabled
    }

    /// Forget the last detection so the same code triggers again.
    pub fn reset(&self) {
        self.shared.state.lock().reset = true;
        self.shared.ready.notify_one();
    }

    /// Frame counters so far.
    pub fn stats(&self) -> FrameStats {
        FrameStats {
            submitted: self.shared.submitted.load(Ordering::SeqCst),
            dropped: self.shared.dropped.load(Ordering::SeqCst),
            analyzed: self.shared.analyzed.load(Ordering::SeqCst),
        }
    }

    /// Wait until every submitted frame has been analyzed or dropped.
    ///
    /// Returns `false` if that did not happen within `timeout`.
    pub fn flush(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut state = self.shared.state.lock();
        loop {
            if self.shared.settled() {
                return true;
            }
            if self.shared.idle.wait_until(&mut state, deadline).timed_out() {
                return self.shared.settled();
            }
        }
    }

    /// Whether the analysis thread is still alive.
    pub fn is_running(&self) -> bool {
        self.worker.as_ref().is_some_and(|w| !w.is_finished())
    }

    /// Stop the analysis thread and wait for it to release its resources.
    ///
    /// A pending, unanalyzed frame is discarded and the torch is switched
    /// off and released. Safe to call repeatedly.
    pub fn stop(&mut self) {
        self.shared.close();
        self.release_torch();

        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                tracing::error!(target: "scanner::analyzer", "Analysis thread panicked");
            }
            tracing::info!(
                target: "scanner::analyzer",
                stats = ?self.stats(),
                "Frame analyzer stopped",
            );
        }
    }
}

impl<F: Send + 'static> FrameAnalyzer<F> {
    fn release_torch(&mut self) {
        let torch = self.torch.get_mut();
        if torch.enabled {
            torch.device.set_enabled(false);
            torch.enabled = false;
            tracing::debug!(target: "scanner::analyzer", "Torch switched off");
        }
        torch.device = Box::new(NoTorch);
    }
}

impl<F: Send + 'static> Drop for FrameAnalyzer<F> {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Analysis thread body. Owns the recognizer and confirmation until it returns.
fn run<R: Recognizer, C: Confirmation>(
    shared: Arc<Shared<R::Frame>>,
    mut recognizer: R,
    mut confirmation: C,
    mut detector: BarcodeDetector,
    events: Sender<ScanEvent>,
) {
    loop {
        let frame = {
            let mut state = shared.state.lock();
            loop {
                if state.closed {
                    return;
                }
                if state.reset {
                    state.reset = false;
                    detector.reset();
                }
                if let Some(frame) = state.frame.take() {
                    break frame;
                }
                shared.ready.wait(&mut state);
            }
        };

        let event = match recognizer.recognize(&frame) {
            Ok(candidates) => detector.accept(&candidates).map(|value| {
                confirmation.confirm(&value);
                tracing::info!(target: "scanner::analyzer", isbn = %value, "Barcode detected");
                ScanEvent::Detected(value)
            }),
            Err(e) => {
                tracing::warn!(target: "scanner::analyzer", "Recognition failed: {}", e);
                Some(ScanEvent::RecognizerError(e.to_string()))
            }
        };
        drop(frame);

        let delivered = event.is_none_or(|event| deliver(&events, event));
        {
            let _state = shared.state.lock();
            shared.analyzed.fetch_add(1, Ordering::SeqCst);
        }
        shared.idle.notify_all();

        if !delivered {
            tracing::debug!(target: "scanner::analyzer", "Event receiver gone, stopping analysis");
            shared.close();
            return;
        }
    }
}

/// Send without blocking. Returns `false` once nobody is listening.
fn deliver(events: &Sender<ScanEvent>, event: ScanEvent) -> bool {
    match events.try_send(event) {
        Ok(()) => true,
        Err(TrySendError::Full(event)) => {
            tracing::warn!(
                target: "scanner::analyzer",
                ?event,
                "Event channel full, dropping event",
            );
            true
        }
        Err(TrySendError::Disconnected(_)) => false,
    }
}
