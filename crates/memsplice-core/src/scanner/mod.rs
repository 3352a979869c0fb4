//! Boundary to the external memory-scanning capability.
//!
//! Production binds [`MemoryScanner`] to the scanmem CLI; tests bind it to an
//! in-memory buffer. The patcher only ever sees the trait.

pub mod protocol;
mod scanmem;

#[cfg(test)]
pub mod mock;

pub use scanmem::ScanmemScanner;

#[cfg(test)]
pub use mock::MockScanner;

use crate::error::Result;

/// One address whose memory matched a scanned pattern at scan time.
///
/// Ephemeral: the target keeps running, so the bytes at `address` may have
/// changed by the time anything acts on the hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanHit {
    pub address: u64,
    pub matched_bytes: Vec<u8>,
}

pub trait MemoryScanner {
    /// Full-process pattern search. Each call is an independent session
    /// against the target; search state does not carry across calls.
    fn scan(&mut self, pattern: &[u8]) -> Result<Vec<ScanHit>>;

    /// Overwrite memory at `address` with `bytes`.
    fn write(&mut self, address: u64, bytes: &[u8]) -> Result<()>;
}
