//! Offline ISBN validation command.

use crate::model::isbn;

/// Print what we can tell about an ISBN without a network
pub fn cmd_check(raw_isbn: &str) -> anyhow::Result<()> {
    let code = isbn::normalize(raw_isbn)?;
    let report = IsbnReport::new(&code);

    println!("ISBN:      {}", code);
    println!("Form:      {}", report.form);
    println!(
        "Checksum:  {}",
        if report.checksum_ok { "✓ valid" } else { "✗ invalid" }
    );
    if let Some(isbn13) = &report.isbn13 {
        println!("ISBN-13:   {}", isbn13);
        println!(
            "Barcode:   {}",
            if report.scannable {
                "✓ scannable as a book EAN-13"
            } else {
                "✗ not a 978/979 book code"
            }
        );
    }

    if !report.checksum_ok {
        anyhow::bail!("check digit does not match for {}", code);
    }
    Ok(())
}

/// Validation results for one normalized ISBN
struct IsbnReport {
    form: &'static str,
    checksum_ok: bool,
    isbn13: Option<String>,
    scannable: bool,
}

impl IsbnReport {
    fn new(code: &str) -> Self {
        let isbn13 = isbn::to_isbn13(code);
        let scannable = isbn13.as_deref().is_some_and(isbn::has_isbn13_prefix);
        Self {
            form: if code.len() == 13 { "ISBN-13" } else { "ISBN-10" },
            checksum_ok: isbn::checksum_valid(code),
            isbn13,
            scannable,
        }
    }
}
