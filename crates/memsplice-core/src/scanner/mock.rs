//! In-memory scanner for tests: a synthetic byte buffer stands in for the
//! target process's address space.

use memchr::memmem;

use crate::error::{Error, Result};
use crate::scanner::{MemoryScanner, ScanHit};

pub struct MockScanner {
    base: u64,
    memory: Vec<u8>,
    spurious_hits: Vec<ScanHit>,
    fail_writes_at: Vec<u64>,
    pub writes: Vec<(u64, Vec<u8>)>,
}

impl MockScanner {
    pub fn new(base: u64, memory: Vec<u8>) -> Self {
        Self {
            base,
            memory,
            spurious_hits: Vec::new(),
            fail_writes_at: Vec::new(),
            writes: Vec::new(),
        }
    }

    /// Emit an extra hit from every scan, regardless of pattern. Simulates a
    /// scanner returning an address whose bytes don't match the request.
    pub fn add_spurious_hit(&mut self, address: u64, matched_bytes: Vec<u8>) {
        self.spurious_hits.push(ScanHit {
            address,
            matched_bytes,
        });
    }

    pub fn fail_write_at(&mut self, address: u64) {
        self.fail_writes_at.push(address);
    }

    pub fn memory(&self) -> &[u8] {
        &self.memory
    }
}

impl MemoryScanner for MockScanner {
    fn scan(&mut self, pattern: &[u8]) -> Result<Vec<ScanHit>> {
        let mut hits: Vec<ScanHit> = memmem::find_iter(&self.memory, pattern)
            .map(|pos| ScanHit {
                address: self.base + pos as u64,
                matched_bytes: pattern.to_vec(),
            })
            .collect();
        hits.extend(self.spurious_hits.iter().cloned());
        Ok(hits)
    }

    fn write(&mut self, address: u64, bytes: &[u8]) -> Result<()> {
        let failed = || Error::WriteFailed {
            address,
            len: bytes.len(),
            message: "mock write rejected".to_string(),
        };
        if self.fail_writes_at.contains(&address) {
            return Err(failed());
        }
        let offset = address.checked_sub(self.base).ok_or_else(failed)? as usize;
        let end = offset.checked_add(bytes.len()).ok_or_else(failed)?;
        if end > self.memory.len() {
            return Err(failed());
        }
        self.memory[offset..end].copy_from_slice(bytes);
        self.writes.push((address, bytes.to_vec()));
        Ok(())
    }
}
