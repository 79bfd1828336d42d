//! Process records

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Point-in-time facts about a single process
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessInfo {
    /// Process ID
    pub pid: u32,
    /// User owning the process (empty if unresolved)
    pub user: String,
    /// Raw command line
    pub command: String,
    /// Resident memory in MB, as rendered by `resident_memory`
    pub ram_mb: String,
    /// Seconds since the process started
    pub uptime_seconds: u64,
    /// `uptime_seconds` as `HH:MM:SS`
    pub uptime: String,
    /// Lifetime CPU utilization as a fraction
    pub cpu_utilization: f64,
}

/// Process list
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessStats {
    /// Processes, in no particular order
    pub processes: Vec<ProcessInfo>,
}

impl ProcessStats {
    /// Get process count
    pub fn process_count(&self) -> usize {
        self.processes.len()
    }

    /// Sorts processes by CPU utilization, busiest first
    pub fn sort_by_cpu(&mut self) {
        self.processes.sort_by(|a, b| {
            b.cpu_utilization
                .partial_cmp(&a.cpu_utilization)
                .unwrap_or(Ordering::Equal)
                .then(a.pid.cmp(&b.pid))
        });
    }

    /// Keeps at most `limit` processes; `0` keeps all
    pub fn truncate(&mut self, limit: usize) {
        if limit > 0 {
            self.processes.truncate(limit);
        }
    }
}
