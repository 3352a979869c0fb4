//! Splice orchestration: scan both sentinels, produce the payload, pair hits
//! into regions, and overwrite every validated region in place.
//!
//! The target process keeps running throughout, so a region observed during
//! scanning may no longer hold the sentinels by the time it is written; a
//! write may legitimately fail (or land in reused memory) and that is
//! recorded per region rather than aborting the run.

use std::path::Path;

use tracing::{debug, info, warn};

use crate::config::SentinelSpec;
use crate::error::{Error, Result};
use crate::hex::format_hex_bytes;
use crate::payload::PayloadProvider;
use crate::region::{self, MatchWarning, Region};
use crate::scanner::MemoryScanner;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteResult {
    Written,
    Failed(String),
}

/// Outcome of one region write attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchOutcome {
    pub region: Region,
    pub result: WriteResult,
}

impl PatchOutcome {
    pub fn is_written(&self) -> bool {
        self.result == WriteResult::Written
    }
}

pub struct Patcher<'a, S: MemoryScanner> {
    scanner: &'a mut S,
    spec: &'a SentinelSpec,
}

impl<'a, S: MemoryScanner> Patcher<'a, S> {
    pub fn new(scanner: &'a mut S, spec: &'a SentinelSpec) -> Self {
        Self { scanner, spec }
    }

    /// Run the full splice sequence for one asset.
    ///
    /// Errors before the write phase are fatal and abort with no memory
    /// touched; from the write phase on, failures are per-region and the
    /// remaining regions are still attempted.
    pub fn splice(
        &mut self,
        provider: &dyn PayloadProvider,
        asset: &Path,
    ) -> Result<Vec<PatchOutcome>> {
        debug!("Phase 1: scanning for start sentinel...");
        let start_hits = self.scanner.scan(self.spec.start_bytes())?;
        debug!(hits = start_hits.len(), "start sentinel scan done");

        // Fresh scanner session; search state is not reused across patterns.
        debug!("Phase 2: scanning for end sentinel...");
        let end_hits = self.scanner.scan(self.spec.end_bytes())?;
        debug!(hits = end_hits.len(), "end sentinel scan done");

        debug!("Phase 3: producing payload for {}...", asset.display());
        let payload = provider.produce(asset)?;
        if payload.is_empty() {
            return Err(Error::PayloadProduction("payload is empty".to_string()));
        }
        info!(len = payload.len(), "payload produced");

        debug!("Phase 4: matching regions...");
        let report = region::match_regions(&start_hits, &end_hits, self.spec, payload.len());
        for warning in &report.warnings {
            log_warning(warning);
        }
        info!(regions = report.regions.len(), "region matching done");

        debug!("Phase 5: writing {} region(s)...", report.regions.len());
        let mut outcomes = Vec::with_capacity(report.regions.len());
        for region in report.regions {
            let result = match self.scanner.write(region.start, payload.bytes()) {
                Ok(()) => WriteResult::Written,
                Err(e) => {
                    warn!(
                        start = format_args!("{:#x}", region.start),
                        "region write failed: {e}"
                    );
                    WriteResult::Failed(e.to_string())
                }
            };
            outcomes.push(PatchOutcome { region, result });
        }
        Ok(outcomes)
    }
}

fn log_warning(warning: &MatchWarning) {
    match warning {
        MatchWarning::MismatchedHit {
            address,
            actual,
            expected,
        } => warn!(
            "scan hit at {address:#x} does not match the requested bytes: got [{}], expected [{}]",
            format_hex_bytes(actual),
            format_hex_bytes(expected),
        ),
        MatchWarning::NoMatchingEnd {
            start,
            expected_length,
            end_candidates,
        } => warn!(
            "no end sentinel {expected_length} bytes after region start {start:#x} (end candidates: {end_candidates:x?})"
        ),
    }
}
