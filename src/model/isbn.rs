//! ISBN normalization and validation.
//!
//! Barcodes on books carry ISBN-13 as EAN-13 with a 978/979 prefix.
//! Users typing codes by hand use hyphens, spaces, and sometimes ISBN-10.

use crate::error::{Error, Result};

/// Prefixes that mark an EAN-13 as an ISBN-13 ("Bookland").
pub const ISBN13_PREFIXES: [&str; 2] = ["978", "979"];

/// Strip separators and check the shape of an ISBN.
///
/// Accepts 13 digits, or 9 digits followed by a digit or `X` (ISBN-10).
/// The checksum is not verified here, see [`checksum_valid`].
pub fn normalize(input: &str) -> Result<String> {
    let cleaned: String = input
        .chars()
        .filter(|c| !matches!(c, '-' | ' '))
        .map(|c| c.to_ascii_uppercase())
        .collect();

    let shape_ok = match cleaned.len() {
        13 => cleaned.bytes().all(|b| b.is_ascii_digit()),
        10 => {
            let (body, check) = cleaned.split_at(9);
            body.bytes().all(|b| b.is_ascii_digit())
                && (check == "X" || check.bytes().all(|b| b.is_ascii_digit()))
        }
        _ => false,
    };

    if shape_ok {
        Ok(cleaned)
    } else {
        Err(Error::InvalidIsbn(input.to_string()))
    }
}

/// Whether a code starts with an ISBN-13 prefix (978 or 979).
pub fn has_isbn13_prefix(code: &str) -> bool {
    ISBN13_PREFIXES.iter().any(|p| code.starts_with(p))
}

/// Verify the check digit of a normalized ISBN-13 or ISBN-10.
pub fn checksum_valid(code: &str) -> bool {
    match code.len() {
        13 => isbn13_check_digit(&code[..12]).is_some_and(|d| code.ends_with(d)),
        10 => isbn10_checksum_valid(code),
        _ => false,
    }
}

/// Convert a normalized ISBN-10 to ISBN-13. ISBN-13 input is returned as-is.
pub fn to_isbn13(code: &str) -> Option<String> {
    match code.len() {
        13 => Some(code.to_string()),
        10 => {
            let body = format!("978{}", &code[..9]);
            let check = isbn13_check_digit(&body)?;
            Some(format!("{body}{check}"))
        }
        _ => None,
    }
}

fn isbn13_check_digit(first_twelve: &str) -> Option<char> {
    if first_twelve.len() != 12 {
        return None;
    }
    let mut sum = 0u32;
    for (i, c) in first_twelve.chars().enumerate() {
        let digit = c.to_digit(10)?;
        sum += if i % 2 == 0 { digit } else { digit * 3 };
    }
    char::from_digit((10 - sum % 10) % 10, 10)
}

fn isbn10_checksum_valid(code: &str) -> bool {
    let mut sum = 0u32;
    for (i, c) in code.chars().enumerate() {
        let value = match c {
            'X' if i == 9 => 10,
            _ => match c.to_digit(10) {
                Some(d) => d,
                None => return false,
            },
        };
        sum += value * (10 - i as u32);
    }
    sum % 11 == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_separators() {
        assert_eq!(normalize("978-0-14-032872-1").unwrap(), "9780140328721");
        assert_eq!(normalize("978 0140 328721").unwrap(), "9780140328721");
    }

    #[test]
    fn test_normalize_accepts_isbn10_with_x() {
        assert_eq!(normalize("0-8044-2957-x").unwrap(), "080442957X");
    }

    #[test]
    fn test_normalize_rejects_bad_shapes() {
        assert!(normalize("12345").is_err());
        assert!(normalize("97801403287A1").is_err());
        assert!(normalize("X123456789").is_err());
        assert!(normalize("").is_err());
    }

    #[test]
    fn test_isbn13_prefix() {
        assert!(has_isbn13_prefix("9780140328721"));
        assert!(has_isbn13_prefix("9791032305690"));
        assert!(!has_isbn13_prefix("4006381333931"));
    }

    #[test]
    fn test_checksum_isbn13() {
        assert!(checksum_valid("9780140328721"));
        assert!(!checksum_valid("9780140328722"));
    }

    #[test]
    fn test_checksum_isbn10() {
        assert!(checksum_valid("0140328726"));
        assert!(checksum_valid("080442957X"));
        assert!(!checksum_valid("0140328727"));
    }

    #[test]
    fn test_to_isbn13() {
        assert_eq!(to_isbn13("0140328726").as_deref(), Some("9780140328721"));
        assert_eq!(to_isbn13("9780140328721").as_deref(), Some("9780140328721"));
        assert_eq!(to_isbn13("123"), None);
    }
}
