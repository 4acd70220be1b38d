//! Text-encoded frames for replaying recorded scans.
//!
//! Each line is one frame. A frame lists the barcodes the camera-side
//! recognizer found, as whitespace-separated `FORMAT:value` tokens:
//!
//! ```text
//! EAN_13:9780140328721 QR_CODE:https://example.com
//! EAN_13:
//! ```
//!
//! An empty value (`EAN_13:`) is a located but undecoded code. An empty line
//! is a frame with no barcodes.

use super::analyzer::Recognizer;
use super::{BarcodeFormat, DecodedBarcode, ScanError};

/// Parse one text frame.
pub fn parse_frame(line: usize, text: &str) -> Result<Vec<DecodedBarcode>, ScanError> {
    text.split_whitespace()
        .map(|token| {
            let Some((tag, value)) = token.split_once(':') else {
                return Err(ScanError::InvalidFrame {
                    line,
                    reason: format!("expected FORMAT:value, got {token:?}"),
                });
            };
            if tag.is_empty() {
                return Err(ScanError::InvalidFrame {
                    line,
                    reason: format!("missing barcode format in {token:?}"),
                });
            }

            Ok(DecodedBarcode {
                format: BarcodeFormat::from_tag(tag),
                raw_value: (!value.is_empty()).then(|| value.to_string()),
            })
        })
        .collect()
}

/// A frame read from a text source, with its line number for error reports
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextFrame {
    pub line: usize,
    pub text: String,
}

impl TextFrame {
    pub fn new(line: usize, text: impl Into<String>) -> Self {
        Self {
            line,
            text: text.into(),
        }
    }

    /// Blank lines are frames; `#` lines are comments and are not
    pub fn is_comment(&self) -> bool {
        self.text.trim_start().starts_with('#')
    }
}

/// Recognizer for [`TextFrame`]s.
#[derive(Debug, Default)]
pub struct TextFrameRecognizer;

impl Recognizer for TextFrameRecognizer {
    type Frame = TextFrame;

    fn recognize(&mut self, frame: &TextFrame) -> Result<Vec<DecodedBarcode>, ScanError> {
        parse_frame(frame.line, &frame.text)
    }
}
