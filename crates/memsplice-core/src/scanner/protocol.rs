//! Line grammar for the scanmem control protocol.
//!
//! Requests are plain-text commands, one per line. A match listing response
//! contains entries of the form:
//!
//! ```text
//! [<index>] <hex-address>, <description>, <hex bytes>, [bytearray]
//! ```
//!
//! Anything a listing line contains that does not fit this grammar is a typed
//! [`Error::ScannerIo`], not a silently empty match list.

use crate::error::{Error, Result};
use crate::hex::{format_hex_bytes, parse_hex_bytes};
use crate::scanner::ScanHit;

pub const SET_BYTEARRAY_MODE: &str = "option scan_data_type bytearray";
pub const RESET: &str = "reset";
pub const LIST: &str = "list";

const MATCH_TAG: &str = "[bytearray]";

/// The search command is the pattern itself, as space-separated hex pairs.
pub fn search_command(pattern: &[u8]) -> String {
    format_hex_bytes(pattern)
}

pub fn write_command(address: u64, bytes: &[u8]) -> String {
    format!("write bytearray {address:x} {}", format_hex_bytes(bytes))
}

/// Command batch for one full scan session: select bytearray mode, clear any
/// prior search state, search, then list matches.
pub fn scan_batch(pattern: &[u8]) -> String {
    [
        SET_BYTEARRAY_MODE,
        RESET,
        &search_command(pattern),
        LIST,
    ]
    .join("\n")
}

/// Command batch for one write session.
pub fn write_batch(address: u64, bytes: &[u8]) -> String {
    format!("{RESET}\n{}", write_command(address, bytes))
}

fn malformed(line: &str, reason: &str) -> Error {
    Error::ScannerIo(format!("bad match line ({reason}): {line:?}"))
}

/// Parse one match entry. The description field may itself contain commas;
/// only the first field (address) and the last two (bytes, tag) are fixed.
pub fn parse_match_line(line: &str) -> Result<ScanHit> {
    let rest = line
        .trim()
        .strip_prefix('[')
        .ok_or_else(|| malformed(line, "missing index"))?;
    let (index, rest) = rest
        .split_once(']')
        .ok_or_else(|| malformed(line, "unterminated index"))?;
    index
        .trim()
        .parse::<usize>()
        .map_err(|_| malformed(line, "non-numeric index"))?;

    let mut fields: Vec<&str> = rest.split(',').map(str::trim).collect();
    if fields.len() < 3 {
        return Err(malformed(line, "too few fields"));
    }
    if fields.pop() != Some(MATCH_TAG) {
        return Err(malformed(line, "missing [bytearray] tag"));
    }
    let bytes_field = fields.pop().unwrap_or_default();
    let address_field = fields[0];

    let address = u64::from_str_radix(address_field, 16)
        .map_err(|_| malformed(line, "bad address"))?;
    let matched_bytes =
        parse_hex_bytes(bytes_field).map_err(|e| malformed(line, &e.to_string()))?;
    if matched_bytes.is_empty() {
        return Err(malformed(line, "empty byte field"));
    }

    Ok(ScanHit {
        address,
        matched_bytes,
    })
}

/// Extract every match entry from a full listing response, skipping prompts,
/// banners, and info lines.
pub fn parse_list_output(output: &str) -> Result<Vec<ScanHit>> {
    let mut hits = Vec::new();
    for line in output.lines() {
        // The interactive prompt may prefix an entry; start at the first '['.
        let Some(pos) = line.find('[') else { continue };
        let candidate = &line[pos..];
        if candidate.trim_end().ends_with(MATCH_TAG) && candidate.len() > MATCH_TAG.len() {
            hits.push(parse_match_line(candidate)?);
        }
    }
    Ok(hits)
}
