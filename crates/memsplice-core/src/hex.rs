//! Hex-pair text handling shared by the config layer and the scanner protocol.
//!
//! Every sentinel or pattern given as text is normalized through
//! [`parse_hex_bytes`], which is what makes byte-sequence comparisons
//! insensitive to case and whitespace: both sides compare as `Vec<u8>`.

use crate::error::{Error, Result};

/// Parse whitespace-separated hex pairs ("DE AD be ef") into bytes.
pub fn parse_hex_bytes(text: &str) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    for token in text.split_whitespace() {
        if token.len() > 2 {
            return Err(Error::InvalidHex(format!(
                "token '{token}' is not a hex pair"
            )));
        }
        let value = u8::from_str_radix(token, 16)
            .map_err(|e| Error::InvalidHex(format!("token '{token}': {e}")))?;
        bytes.push(value);
    }
    Ok(bytes)
}

/// Render bytes in the scanner's wire form: uppercase space-separated pairs.
pub fn format_hex_bytes(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_and_whitespace_insensitive() {
        let upper = parse_hex_bytes("AA BB").unwrap();
        let lower = parse_hex_bytes("aa  bb").unwrap();
        assert_eq!(upper, lower);
        assert_eq!(upper, vec![0xAA, 0xBB]);
    }

    #[test]
    fn parse_format_roundtrip() {
        let bytes = parse_hex_bytes("de ad be ef").unwrap();
        assert_eq!(format_hex_bytes(&bytes), "DE AD BE EF");
        assert_eq!(parse_hex_bytes(&format_hex_bytes(&bytes)).unwrap(), bytes);
    }

    #[test]
    fn parse_rejects_non_hex_tokens() {
        assert!(matches!(
            parse_hex_bytes("DE ZZ"),
            Err(Error::InvalidHex(_))
        ));
    }

    #[test]
    fn parse_rejects_long_tokens() {
        assert!(matches!(
            parse_hex_bytes("DEAD"),
            Err(Error::InvalidHex(_))
        ));
    }

    #[test]
    fn parse_empty_text_yields_no_bytes() {
        assert!(parse_hex_bytes("  ").unwrap().is_empty());
    }
}
