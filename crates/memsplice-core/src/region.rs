//! Pure region matching: pairs start- and end-sentinel scan hits into the
//! address ranges that will receive the payload.

use crate::config::SentinelSpec;
use crate::scanner::ScanHit;

/// A validated contiguous address range. `start` is the first byte after the
/// start sentinel; `end` is the first byte of the end sentinel (exclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub start: u64,
    pub end: u64,
    pub length: usize,
}

/// Non-fatal conditions found while pairing hits. Carried back to the caller
/// with enough context to diagnose without a re-run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchWarning {
    /// The scanner reported an address whose bytes don't match the pattern it
    /// was asked to search for.
    MismatchedHit {
        address: u64,
        actual: Vec<u8>,
        expected: Vec<u8>,
    },
    /// No validated end sentinel sits exactly `expected_length` bytes after
    /// this region start. The start yields no region; matching continues.
    NoMatchingEnd {
        start: u64,
        expected_length: usize,
        end_candidates: Vec<u64>,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchReport {
    pub regions: Vec<Region>,
    pub warnings: Vec<MatchWarning>,
}

/// Validate both hit sets against their sentinels and pair every surviving
/// start with a length-compatible end.
///
/// Multiplicity is allowed throughout: one end may close several starts, and
/// several disjoint regions of the same length are all reported. Among tied
/// ends for one start, the first in scan order is recorded; the write only
/// uses `start` and the payload bytes, so the tie is harmless.
pub fn match_regions(
    start_hits: &[ScanHit],
    end_hits: &[ScanHit],
    spec: &SentinelSpec,
    payload_len: usize,
) -> MatchReport {
    let mut warnings = Vec::new();

    let starts = validated_addresses(start_hits, spec.start_bytes(), &mut warnings);
    let ends = validated_addresses(end_hits, spec.end_bytes(), &mut warnings);

    // The region begins immediately after the start sentinel.
    let start_len = spec.start_bytes().len() as u64;

    let mut regions = Vec::new();
    for raw_start in starts {
        let start = raw_start + start_len;
        let matching_end = ends
            .iter()
            .copied()
            .find(|&end| end > start && (end - start) as usize == payload_len);
        match matching_end {
            Some(end) => regions.push(Region {
                start,
                end,
                length: payload_len,
            }),
            None => warnings.push(MatchWarning::NoMatchingEnd {
                start,
                expected_length: payload_len,
                end_candidates: ends.clone(),
            }),
        }
    }

    MatchReport { regions, warnings }
}

/// Keep the hits whose bytes equal the expected sentinel; warn on the rest.
fn validated_addresses(
    hits: &[ScanHit],
    expected: &[u8],
    warnings: &mut Vec<MatchWarning>,
) -> Vec<u64> {
    let mut addresses = Vec::new();
    for hit in hits {
        if hit.matched_bytes == expected {
            addresses.push(hit.address);
        } else {
            warnings.push(MatchWarning::MismatchedHit {
                address: hit.address,
                actual: hit.matched_bytes.clone(),
                expected: expected.to_vec(),
            });
        }
    }
    addresses
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hex::parse_hex_bytes;

    fn spec() -> SentinelSpec {
        SentinelSpec::new("DE AD", "BE EF").unwrap()
    }

    fn hit(address: u64, bytes: &str) -> ScanHit {
        ScanHit {
            address,
            matched_bytes: parse_hex_bytes(bytes).unwrap(),
        }
    }

    #[test]
    fn single_bracketed_region() {
        // Memory: DE AD 01 02 03 04 BE EF at 0x1000.
        let report = match_regions(&[hit(0x1000, "DE AD")], &[hit(0x1006, "BE EF")], &spec(), 4);
        assert_eq!(
            report.regions,
            vec![Region {
                start: 0x1002,
                end: 0x1006,
                length: 4
            }]
        );
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn wrong_payload_length_yields_no_matching_end() {
        let report = match_regions(&[hit(0x1000, "DE AD")], &[hit(0x1006, "BE EF")], &spec(), 5);
        assert!(report.regions.is_empty());
        assert_eq!(
            report.warnings,
            vec![MatchWarning::NoMatchingEnd {
                start: 0x1002,
                expected_length: 5,
                end_candidates: vec![0x1006],
            }]
        );
    }

    #[test]
    fn zero_start_hits_is_empty_not_an_error() {
        let report = match_regions(&[], &[hit(0x1006, "BE EF")], &spec(), 4);
        assert!(report.regions.is_empty());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn zero_end_hits_warns_for_every_start() {
        let report = match_regions(
            &[hit(0x1000, "DE AD"), hit(0x2000, "DE AD")],
            &[],
            &spec(),
            4,
        );
        assert!(report.regions.is_empty());
        assert_eq!(report.warnings.len(), 2);
    }

    #[test]
    fn spurious_hit_is_warned_and_dropped() {
        let report = match_regions(
            &[hit(0x1000, "DE AD"), hit(0x3000, "00 11")],
            &[hit(0x1006, "BE EF")],
            &spec(),
            4,
        );
        assert_eq!(report.regions.len(), 1);
        assert_eq!(
            report.warnings,
            vec![MatchWarning::MismatchedHit {
                address: 0x3000,
                actual: vec![0x00, 0x11],
                expected: vec![0xDE, 0xAD],
            }]
        );
    }

    #[test]
    fn two_disjoint_duplicate_blocks_both_match() {
        let report = match_regions(
            &[hit(0x1000, "DE AD"), hit(0x5000, "DE AD")],
            &[hit(0x1006, "BE EF"), hit(0x5006, "BE EF")],
            &spec(),
            4,
        );
        assert_eq!(report.regions.len(), 2);
        assert_eq!(report.regions[0].start, 0x1002);
        assert_eq!(report.regions[1].start, 0x5002);
    }

    #[test]
    fn an_end_may_close_more_than_one_start() {
        // Starts at 0x1000 and 0x1004 with ends at 0x1006 and 0x100A: each
        // start finds some end exactly 4 bytes after it.
        let report = match_regions(
            &[hit(0x1000, "DE AD"), hit(0x1004, "DE AD")],
            &[hit(0x1006, "BE EF"), hit(0x100A, "BE EF")],
            &spec(),
            4,
        );
        assert_eq!(
            report.regions,
            vec![
                Region {
                    start: 0x1002,
                    end: 0x1006,
                    length: 4
                },
                Region {
                    start: 0x1006,
                    end: 0x100A,
                    length: 4
                },
            ]
        );
    }

    #[test]
    fn end_before_start_never_matches() {
        let report = match_regions(&[hit(0x2000, "DE AD")], &[hit(0x1000, "BE EF")], &spec(), 4);
        assert!(report.regions.is_empty());
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn matching_is_idempotent() {
        let starts = [hit(0x1000, "DE AD"), hit(0x3000, "00 11")];
        let ends = [hit(0x1006, "BE EF")];
        let first = match_regions(&starts, &ends, &spec(), 4);
        let second = match_regions(&starts, &ends, &spec(), 4);
        assert_eq!(first, second);
    }
}
