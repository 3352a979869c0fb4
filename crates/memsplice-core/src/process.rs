//! Target process discovery via procfs.

use std::fs;

use crate::error::{Error, Result};

/// Resolve a pid by exact process name (the `/proc/<pid>/comm` value).
///
/// When several instances match, the lowest pid wins; handling more than one
/// target process is out of scope.
pub fn find_pid_by_name(name: &str) -> Result<u32> {
    let mut pids = Vec::new();
    for entry in fs::read_dir("/proc")? {
        let entry = entry?;
        let Ok(pid) = entry.file_name().to_string_lossy().parse::<u32>() else {
            continue;
        };
        // The process may exit between readdir and here.
        let Ok(comm) = fs::read_to_string(entry.path().join("comm")) else {
            continue;
        };
        if comm.trim_end() == name {
            pids.push(pid);
        }
    }
    pids.sort_unstable();
    pids.first()
        .copied()
        .ok_or_else(|| Error::ProcessNotFound(name.to_string()))
}
