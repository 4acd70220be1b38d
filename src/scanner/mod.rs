//! Barcode scanning pipeline - turns camera frames into ISBNs.
//!
//! # Design
//!
//! - **Recognition is pluggable**: a [`Recognizer`] turns a frame into
//!   decoded barcode candidates (`{format, raw value}`)
//! - **Detector**: filters candidates to ISBN-like EAN-13 codes and drops
//!   repeats of the last emitted value
//! - **Keep-latest backpressure**: the [`FrameAnalyzer`] holds at most one
//!   pending frame; a newer frame replaces an unanalyzed one
//! - **Dedicated thread**: analysis never runs on the caller's thread, events
//!   come back over a channel
//!
//! # Usage
//!
//! ```rust,ignore
//! let (analyzer, events) =
//!     FrameAnalyzer::start(recognizer, TerminalBell, DetectorConfig::default())?;
//!
//! for frame in camera {
//!     analyzer.submit(frame);
//! }
//!
//! while let Ok(ScanEvent::Detected(isbn)) = events.try_recv() {
//!     println!("Scanned {isbn}");
//! }
//!
//! // Stops the thread and releases the recognizer:
//! drop(analyzer);
//! ```

pub mod analyzer;
pub mod detector;
pub mod input;

use std::fmt;

pub use analyzer::{
    Confirmation, FrameAnalyzer, FrameStats, NoTorch, Recognizer, ScanEvent, Silent, Submission,
    TerminalBell, TerminalTorch, Torch,
};
pub use detector::{BarcodeDetector, DetectorConfig};
pub use input::{parse_frame, TextFrame, TextFrameRecognizer};

/// Barcode symbologies reported by recognizers
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BarcodeFormat {
    Ean13,
    Ean8,
    UpcA,
    UpcE,
    Code128,
    Code39,
    Itf,
    QrCode,
    Other(String),
}

impl BarcodeFormat {
    /// Parse a format tag such as `EAN_13`, `ean13` or `EAN-13`
    pub fn from_tag(tag: &str) -> Self {
        let normalized: String = tag
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .map(|c| c.to_ascii_uppercase())
            .collect();

        match normalized.as_str() {
            "EAN13" => BarcodeFormat::Ean13,
            "EAN8" => BarcodeFormat::Ean8,
            "UPCA" => BarcodeFormat::UpcA,
            "UPCE" => BarcodeFormat::UpcE,
            "CODE128" => BarcodeFormat::Code128,
            "CODE39" => BarcodeFormat::Code39,
            "ITF" => BarcodeFormat::Itf,
            "QR" | "QRCODE" => BarcodeFormat::QrCode,
            _ => BarcodeFormat::Other(tag.to_string()),
        }
    }
}

impl fmt::Display for BarcodeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BarcodeFormat::Ean13 => f.write_str("EAN_13"),
            BarcodeFormat::Ean8 => f.write_str("EAN_8"),
            BarcodeFormat::UpcA => f.write_str("UPC_A"),
            BarcodeFormat::UpcE => f.write_str("UPC_E"),
            BarcodeFormat::Code128 => f.write_str("CODE_128"),
            BarcodeFormat::Code39 => f.write_str("CODE_39"),
            BarcodeFormat::Itf => f.write_str("ITF"),
            BarcodeFormat::QrCode => f.write_str("QR_CODE"),
            BarcodeFormat::Other(tag) => f.write_str(tag),
        }
    }
}

/// One barcode found in a frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedBarcode {
    pub format: BarcodeFormat,
    /// Decoded text; recognizers may fail to decode a located code
    pub raw_value: Option<String>,
}

impl DecodedBarcode {
    pub fn new(format: BarcodeFormat, raw_value: impl Into<String>) -> Self {
        Self {
            format,
            raw_value: Some(raw_value.into()),
        }
    }
}

/// Errors from the scanning pipeline
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("Failed to start analysis thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("Recognizer failed: {0}")]
    Recognizer(String),

    #[error("Invalid frame on line {line}: {reason}")]
    InvalidFrame { line: usize, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_tags() {
        assert_eq!(BarcodeFormat::from_tag("EAN_13"), BarcodeFormat::Ean13);
        assert_eq!(BarcodeFormat::from_tag("ean-13"), BarcodeFormat::Ean13);
        assert_eq!(BarcodeFormat::from_tag("EAN8"), BarcodeFormat::Ean8);
        assert_eq!(BarcodeFormat::from_tag("qr_code"), BarcodeFormat::QrCode);
        assert_eq!(
            BarcodeFormat::from_tag("AZTEC"),
            BarcodeFormat::Other("AZTEC".to_string())
        );
    }

    #[test]
    fn test_format_display_roundtrips_through_tag() {
        for format in [BarcodeFormat::Ean13, BarcodeFormat::UpcA, BarcodeFormat::QrCode] {
            assert_eq!(BarcodeFormat::from_tag(&format.to_string()), format);
        }
    }
}
