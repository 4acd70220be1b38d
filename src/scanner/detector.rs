//! ISBN barcode filter with last-value de-duplication.

use super::{BarcodeFormat, DecodedBarcode};
use crate::model::isbn;

/// Which codes count as a book barcode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectorConfig {
    /// Only EAN-13 with a 978/979 prefix
    pub strict_isbn: bool,
    /// Also accept EAN-8 when not strict
    pub accept_ean8: bool,
    /// In strict mode, also require a valid ISBN-13 check digit
    pub verify_checksum: bool,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            strict_isbn: true,
            accept_ean8: false,
            verify_checksum: false,
        }
    }
}

/// Picks the book barcode out of a frame and suppresses repeats.
///
/// Only the last emitted value is remembered: V1, V1 emits once, while
/// V1, V2, V1 emits three times.
#[derive(Debug, Default)]
pub struct BarcodeDetector {
    config: DetectorConfig,
    last_value: Option<String>,
}

impl BarcodeDetector {
    pub fn new(config: DetectorConfig) -> Self {
        Self {
            config,
            last_value: None,
        }
    }

    /// First candidate that looks like a book barcode
    pub fn select<'a>(&self, candidates: &'a [DecodedBarcode]) -> Option<&'a str> {
        candidates.iter().find_map(|candidate| {
            let value = candidate.raw_value.as_deref()?;
            self.accepts(&candidate.format, value).then_some(value)
        })
    }

    /// Feed one frame's candidates; returns a value only when it is new
    pub fn accept(&mut self, candidates: &[DecodedBarcode]) -> Option<String> {
        let value = self.select(candidates)?;
        if self.last_value.as_deref() == Some(value) {
            return None;
        }
        self.last_value = Some(value.to_string());
        self.last_value.clone()
    }

    /// Forget the last value so the same code can trigger again
    pub fn reset(&mut self) {
        self.last_value = None;
    }

    /// The most recently emitted value
    pub fn last_value(&self) -> Option<&str> {
        self.last_value.as_deref()
    }

    fn accepts(&self, format: &BarcodeFormat, value: &str) -> bool {
        if self.config.strict_isbn {
            *format == BarcodeFormat::Ean13
                && value.len() == 13
                && value.bytes().all(|b| b.is_ascii_digit())
                && isbn::has_isbn13_prefix(value)
                && (!self.config.verify_checksum || isbn::checksum_valid(value))
        } else {
            match format {
                BarcodeFormat::Ean13 => true,
                BarcodeFormat::Ean8 => self.config.accept_ean8,
                _ => false,
            }
        }
    }
}
