//! Primary/secondary signature parsing and presentation.
//!
//! The primary is 4 raw bytes, always supplied/shown as an 8-char hex string.
//! The secondary is 6 raw bytes, accepted either as a 12-char hex string or
//! as 6 printable-ASCII bytes (0x20..=0x7E), and always shown as 12-char
//! lowercase hex (with an optional ASCII rendering when every byte is
//! printable).

use crate::error::{Result, ScavengerError};

fn is_hex_digit(c: char) -> bool {
    c.is_ascii_hexdigit()
}

/// Parse an 8-char hex string into the 4-byte primary signature.
pub fn parse_primary(s: &str) -> Result<[u8; 4]> {
    if s.len() != 8 || !s.chars().all(is_hex_digit) {
        return Err(ScavengerError::InvalidSignature(format!(
            "primary signature must be exactly 8 hex digits, got {s:?}"
        )));
    }
    let bytes = hex::decode(s).map_err(|e| {
        ScavengerError::InvalidSignature(format!("primary signature is not valid hex: {e}"))
    })?;
    let mut out = [0u8; 4];
    out.copy_from_slice(&bytes);
    Ok(out)
}

/// Parse a 12-char hex string, or 6 printable-ASCII bytes, into the 6-byte
/// secondary signature.
pub fn parse_secondary(s: &str) -> Result<[u8; 6]> {
    if s.chars().count() == 12 && s.chars().all(is_hex_digit) {
        let bytes = hex::decode(s).map_err(|e| {
            ScavengerError::InvalidSignature(format!("secondary signature is not valid hex: {e}"))
        })?;
        let mut out = [0u8; 6];
        out.copy_from_slice(&bytes);
        return Ok(out);
    }

    let bytes = s.as_bytes();
    if bytes.len() == 6 && bytes.iter().all(|&b| (0x20..=0x7E).contains(&b)) {
        let mut out = [0u8; 6];
        out.copy_from_slice(bytes);
        return Ok(out);
    }

    Err(ScavengerError::InvalidSignature(format!(
        "secondary signature must be 12 hex digits or 6 printable ASCII bytes, got {s:?}"
    )))
}

/// Render the primary signature as 8-char lowercase hex.
pub fn primary_to_hex(bytes: &[u8; 4]) -> String {
    hex::encode(bytes)
}

/// Render the secondary signature as 12-char lowercase hex.
pub fn secondary_to_hex(bytes: &[u8; 6]) -> String {
    hex::encode(bytes)
}

/// Render the secondary signature as ASCII text, if every byte is printable
/// (0x20..=0x7E).
pub fn secondary_to_ascii(bytes: &[u8; 6]) -> Option<String> {
    if bytes.iter().all(|&b| (0x20..=0x7E).contains(&b)) {
        Some(String::from_utf8_lossy(bytes).into_owned())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_roundtrip() {
        let b = parse_primary("01020304").unwrap();
        assert_eq!(b, [0x01, 0x02, 0x03, 0x04]);
        assert_eq!(primary_to_hex(&b), "01020304");
    }

    #[test]
    fn primary_case_insensitive() {
        assert_eq!(parse_primary("ABCDEF12").unwrap(), parse_primary("abcdef12").unwrap());
    }

    #[test]
    fn primary_rejects_bad_length() {
        assert!(parse_primary("010203").is_err());
        assert!(parse_primary("0102030405").is_err());
        assert!(parse_primary("zzzzzzzz").is_err());
    }

    #[test]
    fn secondary_hex_form() {
        let b = parse_secondary("6578616d706c").unwrap();
        assert_eq!(&b, b"exampl");
        assert_eq!(secondary_to_hex(&b), "6578616d706c");
    }

    #[test]
    fn secondary_ascii_form() {
        let b = parse_secondary("exampl").unwrap();
        assert_eq!(&b, b"exampl");
        assert_eq!(secondary_to_ascii(&b).as_deref(), Some("exampl"));
    }

    #[test]
    fn secondary_ascii_rejects_non_printable() {
        // 6 bytes, but the input string isn't the right length once one byte
        // is non-ASCII, and a literal control character isn't printable.
        assert!(parse_secondary("ex\tmpl").is_err());
    }

    #[test]
    fn secondary_rejects_wrong_shapes() {
        assert!(parse_secondary("too_short").is_err());
        assert!(parse_secondary("this-is-too-long").is_err());
    }
}
