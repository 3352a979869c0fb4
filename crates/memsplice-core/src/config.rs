//! Sentinel configuration: a section-per-asset store mapping each spliceable
//! asset to the byte sequences that bracket it in the target's memory.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::hex::parse_hex_bytes;

/// The start and end marker bytes for one named asset.
///
/// Both sequences are non-empty; this is enforced at parse time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentinelSpec {
    start_bytes: Vec<u8>,
    end_bytes: Vec<u8>,
}

impl SentinelSpec {
    /// Build a spec from hex-pair text (any case, any whitespace).
    pub fn new(start: &str, end: &str) -> Result<Self> {
        let start_bytes = parse_hex_bytes(start)?;
        let end_bytes = parse_hex_bytes(end)?;
        if start_bytes.is_empty() {
            return Err(Error::InvalidSentinel(
                "start sentinel is empty".to_string(),
            ));
        }
        if end_bytes.is_empty() {
            return Err(Error::InvalidSentinel("end sentinel is empty".to_string()));
        }
        Ok(Self {
            start_bytes,
            end_bytes,
        })
    }

    pub fn start_bytes(&self) -> &[u8] {
        &self.start_bytes
    }

    pub fn end_bytes(&self) -> &[u8] {
        &self.end_bytes
    }
}

#[derive(Debug, Deserialize)]
struct RawTarget {
    start: String,
    end: String,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    targets: BTreeMap<String, RawTarget>,
}

/// Loaded sentinel configuration; read-only after [`SpliceConfig::load`].
#[derive(Debug, Clone)]
pub struct SpliceConfig {
    targets: BTreeMap<String, SentinelSpec>,
}

impl SpliceConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(content)?;
        let mut targets = BTreeMap::new();
        for (asset, target) in raw.targets {
            let spec = SentinelSpec::new(&target.start, &target.end)?;
            targets.insert(asset, spec);
        }
        Ok(Self { targets })
    }

    /// Look up the sentinel spec for an asset, failing with `ConfigNotFound`
    /// (naming the sections that do exist) when the asset has no section.
    pub fn spec(&self, asset: &str) -> Result<&SentinelSpec> {
        self.targets
            .get(asset)
            .ok_or_else(|| Error::ConfigNotFound {
                asset: asset.to_string(),
                available: self.targets.keys().cloned().collect(),
            })
    }

    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.targets.keys().map(String::as_str)
    }
}
