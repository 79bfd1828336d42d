//! CPU time accounting

use serde::{Deserialize, Serialize};

/// Aggregate CPU time breakdown from the `cpu` line of `/proc/stat`.
///
/// Every counter is the cumulative number of jiffies spent in that state
/// since boot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpuTime {
    /// Time spent in user mode
    pub user: u64,
    /// Time spent in user mode with low priority (nice)
    pub nice: u64,
    /// Time spent in system mode
    pub system: u64,
    /// Time spent idle
    pub idle: u64,
    /// Time waiting for I/O
    pub iowait: u64,
    /// Time servicing hardware interrupts
    pub irq: u64,
    /// Time servicing software interrupts
    pub softirq: u64,
    /// Time stolen by hypervisor
    pub steal: u64,
}

impl CpuTime {
    /// Counters in kernel order: user, nice, system, idle, iowait, irq,
    /// softirq, steal.
    pub fn fields(&self) -> [u64; 8] {
        [
            self.user,
            self.nice,
            self.system,
            self.idle,
            self.iowait,
            self.irq,
            self.softirq,
            self.steal,
        ]
    }

    /// Busy time (non-idle). Saturates at `u64::MAX`.
    pub fn active(&self) -> u64 {
        [self.user, self.nice, self.system, self.irq, self.softirq, self.steal]
            .into_iter()
            .fold(0u64, u64::saturating_add)
    }

    /// Idle time including I/O wait
    pub fn idle_total(&self) -> u64 {
        self.idle.saturating_add(self.iowait)
    }

    /// Total CPU time
    pub fn total(&self) -> u64 {
        self.active().saturating_add(self.idle_total())
    }

    /// Busy fraction of the jiffies elapsed since `earlier`.
    ///
    /// Returns `None` when no jiffies elapsed. The result is not clamped.
    pub fn utilization_since(&self, earlier: &CpuTime) -> Option<f64> {
        let total_delta = self.total().saturating_sub(earlier.total());
        if total_delta == 0 {
            return None;
        }
        let idle_delta = self.idle_total().saturating_sub(earlier.idle_total());
        Some((total_delta as f64 - idle_delta as f64) / total_delta as f64)
    }
}
