//! System-wide `/proc/stat` accounting

use super::{soft, SystemReader};
use crate::core::cpu::CpuTime;
use crate::error::{Error, Result};
use crate::platform::common::{find_keyed_value, parse_token};
use std::fs;

impl SystemReader {
    /// Aggregate CPU time sample, or an all-zero sample
    pub fn cpu_times(&self) -> CpuTime {
        soft(self.try_cpu_times(), "cpu times")
    }

    /// Aggregate CPU time sample from the `cpu` line
    pub fn try_cpu_times(&self) -> Result<CpuTime> {
        parse_cpu_times(&self.read_stat()?)
    }

    /// Total system jiffies (busy + idle)
    pub fn jiffies(&self) -> u64 {
        self.cpu_times().total()
    }

    /// Busy system jiffies: user, nice, system, irq, softirq, steal
    pub fn active_jiffies(&self) -> u64 {
        self.cpu_times().active()
    }

    /// Idle system jiffies: idle, iowait
    pub fn idle_jiffies(&self) -> u64 {
        self.cpu_times().idle_total()
    }

    /// Processes created since boot, or `0`
    pub fn total_processes(&self) -> u64 {
        soft(self.try_total_processes(), "total processes")
    }

    /// Processes created since boot (`processes` line)
    pub fn try_total_processes(&self) -> Result<u64> {
        self.stat_value("processes")
    }

    /// Runnable processes, or `0`
    pub fn running_processes(&self) -> u32 {
        soft(self.try_running_processes(), "running processes")
    }

    /// Runnable processes (`procs_running` line)
    pub fn try_running_processes(&self) -> Result<u32> {
        self.stat_value("procs_running")
    }

    fn read_stat(&self) -> Result<String> {
        Ok(fs::read_to_string(self.paths.system_file("stat"))?)
    }

    fn stat_value<T>(&self, key: &str) -> Result<T>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        let content = self.read_stat()?;
        let token = find_keyed_value(&content, key)
            .ok_or_else(|| Error::MissingField(key.to_string()))?;
        parse_token(token, key)
    }
}

/// Parse the aggregate `cpu` line of `/proc/stat` content.
///
/// Per-core lines (`cpu0`, `cpu1`, ...) are ignored. The first four counters
/// are required; iowait, irq, softirq and steal read as 0 on kernels that
/// do not report them.
pub fn parse_cpu_times(content: &str) -> Result<CpuTime> {
    let line = content
        .lines()
        .find(|line| line.split_whitespace().next() == Some("cpu"))
        .ok_or_else(|| Error::MissingField("aggregate cpu line".to_string()))?;

    let values = line
        .split_whitespace()
        .skip(1)
        .take(8)
        .map(|token| parse_token::<u64>(token, "cpu time"))
        .collect::<Result<Vec<u64>>>()?;

    if values.len() < 4 {
        return Err(Error::Parse(format!(
            "expected at least 4 cpu counters, got {}",
            values.len()
        )));
    }
    let get = |i: usize| values.get(i).copied().unwrap_or(0);

    Ok(CpuTime {
        user: values[0],
        nice: values[1],
        system: values[2],
        idle: values[3],
        iowait: get(4),
        irq: get(5),
        softirq: get(6),
        steal: get(7),
    })
}
