//! Point-in-time view of the host and its processes

use crate::config::Config;
use crate::core::process::{ProcessInfo, ProcessStats};
use crate::error::{Error, Result};
use crate::format::{elapsed_time, percent};
use crate::platform::linux::SystemReader;
use crate::sampler::CpuSampler;
use log::debug;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Complete system snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemSnapshot {
    /// `PRETTY_NAME` of the installed OS
    pub operating_system: String,
    /// Kernel release
    pub kernel: String,
    /// Fraction of memory not free
    pub memory_utilization: f64,
    /// Fraction of CPU time busy over the sample window (`None` if no
    /// jiffies elapsed)
    pub cpu_utilization: Option<f64>,
    /// Seconds since boot
    pub uptime_seconds: u64,
    /// `uptime_seconds` as `HH:MM:SS`
    pub uptime: String,
    /// Processes created since boot
    pub total_processes: u64,
    /// Processes currently runnable
    pub running_processes: u32,
    /// Processes, busiest first
    pub processes: Vec<ProcessInfo>,
}

impl SystemSnapshot {
    /// One-line human-readable summary
    pub fn summary(&self) -> String {
        format!(
            "{} ({}) | CPU {} | Mem {} | Up {} | Procs {} running / {} total",
            self.operating_system,
            self.kernel,
            percent(self.cpu_utilization.unwrap_or(f64::NAN)),
            percent(self.memory_utilization),
            self.uptime,
            self.running_processes,
            self.total_processes,
        )
    }

    /// Pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Combines the reader and the CPU sampler into snapshots
#[derive(Debug, Clone)]
pub struct Monitor {
    reader: SystemReader,
    sampler: CpuSampler,
    process_limit: usize,
}

impl Default for Monitor {
    fn default() -> Self {
        Self::new()
    }
}

impl Monitor {
    /// Monitor the live system with a one-second CPU window
    pub fn new() -> Self {
        Self::from_reader(SystemReader::default(), crate::sampler::DEFAULT_INTERVAL)
    }

    /// Monitor the live system with a custom CPU window
    ///
    /// # Arguments
    ///
    /// * `interval` - Sample window in seconds
    pub fn with_interval(interval: f64) -> Result<Self> {
        let interval = Duration::try_from_secs_f64(interval)
            .map_err(|e| Error::Config(format!("Invalid interval {}: {}", interval, e)))?;
        Ok(Self::from_reader(SystemReader::default(), interval))
    }

    /// Monitor with paths, interval and process limit from `config`
    pub fn from_config(config: &Config) -> Self {
        let reader = SystemReader::new(config.paths.clone());
        let mut monitor = Self::from_reader(reader, config.general.interval());
        monitor.process_limit = config.general.process_limit;
        monitor
    }

    /// Monitor over an explicit reader
    pub fn from_reader(reader: SystemReader, interval: Duration) -> Self {
        Self {
            sampler: CpuSampler::new(reader.clone(), interval),
            reader,
            process_limit: 0,
        }
    }

    /// Keep at most `limit` processes in snapshots (0 = all)
    pub fn with_process_limit(mut self, limit: usize) -> Self {
        self.process_limit = limit;
        self
    }

    /// The underlying reader
    pub fn reader(&self) -> &SystemReader {
        &self.reader
    }

    /// The CPU sampler
    pub fn sampler(&self) -> &CpuSampler {
        &self.sampler
    }

    /// CPU utilization over one sample window, `None` if no jiffies elapsed
    pub fn cpu_utilization(&self) -> Option<f64> {
        match self.sampler.utilization() {
            Ok(ratio) => Some(ratio),
            Err(e) => {
                debug!("cpu utilization unknown: {}", e);
                None
            }
        }
    }

    /// Live processes, busiest first
    ///
    /// Processes that exit between enumeration and reading are skipped.
    pub fn processes(&self) -> Vec<ProcessInfo> {
        let mut stats = ProcessStats {
            processes: self
                .reader
                .pids()
                .into_iter()
                .filter_map(|pid| self.reader.process_info(pid))
                .collect(),
        };
        stats.sort_by_cpu();
        stats.truncate(self.process_limit);
        stats.processes
    }

    /// Get current snapshot of all statistics
    ///
    /// Blocks for one sample window while measuring CPU utilization.
    pub fn snapshot(&self) -> SystemSnapshot {
        let cpu_utilization = self.cpu_utilization();
        let uptime_seconds = self.reader.uptime();

        SystemSnapshot {
            operating_system: self.reader.operating_system(),
            kernel: self.reader.kernel(),
            memory_utilization: self.reader.memory_utilization(),
            cpu_utilization,
            uptime_seconds,
            uptime: elapsed_time(uptime_seconds),
            total_processes: self.reader.total_processes(),
            running_processes: self.reader.running_processes(),
            processes: self.processes(),
        }
    }
}
