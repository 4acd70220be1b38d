//! Barcode scanning command.
//!
//! Replays recorded frames through the same analyzer a camera feed would use:
//! frames are submitted at a fixed interval, the analysis thread drops frames
//! it can't keep up with, and each new ISBN is reported once.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use crossbeam_channel::Receiver;
use tokio::runtime::Runtime;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::lookup::{BookLookup, CompositeLookup};
use crate::result_state::{ResultStatus, ScanResultModel};
use crate::scanner::input::TextFrame;
use crate::scanner::{
    Confirmation, DetectorConfig, FrameAnalyzer, FrameStats, ScanEvent, Silent, Submission,
    TerminalBell, TerminalTorch, TextFrameRecognizer,
};

use super::print_book;

/// How long to wait for the last frame before giving up on it
const FLUSH_TIMEOUT: Duration = Duration::from_secs(5);

/// Options for `scan`
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    pub input: Option<PathBuf>,
    pub lookup: bool,
    pub no_strict: bool,
    pub ean8: bool,
    pub verify_checksum: bool,
    pub no_beep: bool,
    pub torch: bool,
    pub frame_interval_ms: Option<u64>,
}

impl ScanOptions {
    /// Detector settings: command-line flags on top of the config file
    fn detector(&self, config: &Config) -> DetectorConfig {
        let mut detector = config.scanner.detector();
        if self.no_strict {
            detector.strict_isbn = false;
        }
        if self.ean8 {
            detector.accept_ean8 = true;
        }
        if self.verify_checksum {
            detector.verify_checksum = true;
        }
        detector
    }

    fn frame_interval(&self, config: &Config) -> Duration {
        Duration::from_millis(
            self.frame_interval_ms
                .unwrap_or(config.scanner.frame_interval_ms),
        )
    }
}

/// What a finished scan saw
#[derive(Debug, Clone, Copy)]
pub struct ScanSummary {
    pub stats: FrameStats,
    pub detected: usize,
}

/// Detect ISBNs in a frame stream
pub fn cmd_scan(
    rt: &Runtime,
    config: &Config,
    options: &ScanOptions,
) -> anyhow::Result<ScanSummary> {
    let reader: Box<dyn BufRead> = match &options.input {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("Failed to open {:?}", path))?;
            println!("Scanning frames from {:?}", path);
            Box::new(BufReader::new(file))
        }
        None => {
            println!("Scanning frames from stdin (one frame per line, Ctrl-D to finish)");
            Box::new(io::stdin().lock())
        }
    };

    let summary = if config.scanner.beep && !options.no_beep {
        run_scan(rt, config, options, reader, TerminalBell)?
    } else {
        run_scan(rt, config, options, reader, Silent)?
    };

    println!();
    println!(
        "Frames: {} submitted, {} analyzed, {} dropped",
        summary.stats.submitted, summary.stats.analyzed, summary.stats.dropped
    );
    println!("Detected {} ISBN(s)", summary.detected);
    Ok(summary)
}

fn run_scan<C: Confirmation>(
    rt: &Runtime,
    config: &Config,
    options: &ScanOptions,
    reader: Box<dyn BufRead>,
    confirmation: C,
) -> anyhow::Result<ScanSummary> {
    let detector = options.detector(config);
    let interval = options.frame_interval(config);
    info!(target: "cli::scan", ?detector, ?interval, lookup = options.lookup, "Starting scan");

    let resolver: Option<Arc<dyn BookLookup>> = options
        .lookup
        .then(|| Arc::new(CompositeLookup::from_config(&config.catalogs)) as Arc<dyn BookLookup>);

    let (mut analyzer, events) = FrameAnalyzer::start(TextFrameRecognizer, confirmation, detector)?;
    let mut session = ScanSession::new(rt, resolver);
    if options.torch {
        analyzer = analyzer.with_torch(TerminalTorch);
        analyzer.set_torch(true);
    }

    for (index, line) in reader.lines().enumerate() {
        let frame = TextFrame::new(index + 1, line.context("Failed to read frame")?);
        if frame.is_comment() {
            continue;
        }

        if analyzer.submit(frame) == Submission::Replaced {
            debug!(target: "cli::scan", line = index + 1, "Analyzer busy, dropped previous frame");
        }
        if !interval.is_zero() {
            std::thread::sleep(interval);
        }
        session.drain(&events);
    }

    if !analyzer.flush(FLUSH_TIMEOUT) {
        warn!(target: "cli::scan", "Timed out waiting for the last frame");
    }
    session.drain(&events);

    let stats = analyzer.stats();
    analyzer.stop();

    session.finish();

    Ok(ScanSummary {
        stats,
        detected: session.detected,
    })
}

/// Detections seen so far and their pending lookups
struct ScanSession<'rt> {
    rt: &'rt Runtime,
    resolver: Option<Arc<dyn BookLookup>>,
    pending: Vec<ScanResultModel>,
    detected: usize,
}

impl<'rt> ScanSession<'rt> {
    fn new(rt: &'rt Runtime, resolver: Option<Arc<dyn BookLookup>>) -> Self {
        Self {
            rt,
            resolver,
            pending: Vec::new(),
            detected: 0,
        }
    }

    /// Handle every event that is ready without waiting
    fn drain(&mut self, events: &Receiver<ScanEvent>) {
        for event in events.try_iter() {
            match event {
                ScanEvent::Detected(isbn) => {
                    self.detected += 1;
                    println!("Detected: {}", isbn);
                    if let Some(resolver) = &self.resolver {
                        // Lookups run concurrently while scanning continues
                        let _guard = self.rt.enter();
                        self.pending
                            .push(ScanResultModel::new(isbn, Arc::clone(resolver)));
                    }
                }
                ScanEvent::RecognizerError(message) => {
                    eprintln!("Skipped frame: {}", message);
                }
            }
        }
    }

    /// Wait for pending lookups and print their results in detection order
    fn finish(&mut self) {
        for model in self.pending.drain(..) {
            let state = self.rt.block_on(model.wait_settled());
            println!();
            match state.status() {
                ResultStatus::Success => print_book(&state.scanned),
                _ => println!(
                    "  {}: {}",
                    state.scanned.isbn,
                    state.error.as_deref().unwrap_or("Could not fetch book data")
                ),
            }
        }
    }
}
