//! # memsplice-core
//!
//! Core library for memsplice, a tool that hot-swaps data inside a running
//! process by locating regions bracketed by known sentinel byte sequences.
//!
//! This crate provides:
//! - Sentinel configuration loading (section-per-asset TOML)
//! - A scanner abstraction bound to the scanmem control protocol
//! - Pure region matching over scan hits
//! - Payload production via the external `w4 png2src` converter
//! - Splice orchestration with per-region write outcomes
//!
//! The target process keeps running while it is scanned and written; nothing
//! here pauses or locks it, so writes race against the target by design.

pub mod config;
pub mod error;
pub mod hex;
pub mod patcher;
pub mod payload;
pub mod process;
pub mod region;
pub mod scanner;

pub use config::{SentinelSpec, SpliceConfig};
pub use error::{Error, Result};
pub use hex::{format_hex_bytes, parse_hex_bytes};
pub use patcher::{PatchOutcome, Patcher, WriteResult};
pub use payload::{Payload, PayloadProvider, W4Png2Src, find_w4_in_path, parse_byte_literals};
pub use process::find_pid_by_name;
pub use region::{MatchReport, MatchWarning, Region, match_regions};
pub use scanner::{MemoryScanner, ScanHit, ScanmemScanner};
