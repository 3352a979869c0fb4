//! Payload production: turning a source asset into the bytes to splice in.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::error::{Error, Result};

/// The byte sequence written into each validated region. Immutable once
/// produced; its length fixes which regions are considered valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    bytes: Vec<u8>,
}

impl Payload {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Converts a source asset into an ordered byte sequence of known length.
pub trait PayloadProvider {
    fn produce(&self, asset: &Path) -> Result<Payload>;
}

/// Runs `w4 png2src` to convert a PNG into its in-memory byte representation.
///
/// The tool prints a comma-separated byte-literal list (`0x00, 0xFF, ...`);
/// any stderr output or nonzero exit is treated as a production failure.
pub struct W4Png2Src {
    w4_path: PathBuf,
    template: PathBuf,
}

impl W4Png2Src {
    pub fn new(w4_path: impl Into<PathBuf>, template: impl Into<PathBuf>) -> Self {
        Self {
            w4_path: w4_path.into(),
            template: template.into(),
        }
    }
}

impl PayloadProvider for W4Png2Src {
    fn produce(&self, asset: &Path) -> Result<Payload> {
        debug!(asset = %asset.display(), "running w4 png2src");
        let output = Command::new(&self.w4_path)
            .arg("png2src")
            .arg("--template")
            .arg(&self.template)
            .arg(asset)
            .output()
            .map_err(|e| {
                Error::PayloadProduction(format!(
                    "failed to run {}: {e}",
                    self.w4_path.display()
                ))
            })?;

        if !output.status.success() || !output.stderr.is_empty() {
            return Err(Error::PayloadProduction(format!(
                "w4 png2src failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout);
        Ok(Payload::new(parse_byte_literals(text.trim())?))
    }
}

/// Parse a `0x00, 0xFF, ...` literal list. Plain decimal literals are also
/// accepted. Empty output or a malformed literal is a production failure.
pub fn parse_byte_literals(text: &str) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    for raw in text.split(',') {
        let token = raw.trim();
        if token.is_empty() {
            continue;
        }
        let parsed = match token.strip_prefix("0x").or_else(|| token.strip_prefix("0X")) {
            Some(hex) => u8::from_str_radix(hex, 16),
            None => token.parse::<u8>(),
        };
        let value = parsed.map_err(|e| {
            Error::PayloadProduction(format!("invalid byte literal '{token}': {e}"))
        })?;
        bytes.push(value);
    }
    if bytes.is_empty() {
        return Err(Error::PayloadProduction(
            "converter produced no bytes".to_string(),
        ));
    }
    Ok(bytes)
}

/// Locate the `w4` binary on PATH.
pub fn find_w4_in_path() -> Option<PathBuf> {
    let path = std::env::var_os("PATH")?;
    std::env::split_paths(&path)
        .map(|dir| dir.join("w4"))
        .find(|candidate| candidate.is_file())
}
