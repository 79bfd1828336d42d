//! Two-sample CPU utilization
//!
//! `/proc/stat` only exposes cumulative jiffy counters, so an instantaneous
//! utilization needs two samples taken a known interval apart:
//!
//! ```text
//! utilization = (Δtotal - Δidle) / Δtotal
//! ```
//!
//! # Examples
//!
//! ```no_run
//! use sysmon::CpuSampler;
//! use std::time::Duration;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let sampler = CpuSampler::with_interval(Duration::from_millis(250));
//! println!("CPU: {:.1}%", sampler.utilization()? * 100.0);
//! # Ok(())
//! # }
//! ```

use crate::core::cpu::CpuTime;
use crate::error::{Error, Result};
use crate::platform::linux::SystemReader;
use log::debug;
use std::time::Duration;

/// Default sampling window
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

/// Measures CPU utilization across a blocking sample window
#[derive(Debug, Clone)]
pub struct CpuSampler {
    reader: SystemReader,
    interval: Duration,
}

impl Default for CpuSampler {
    fn default() -> Self {
        Self::new(SystemReader::default(), DEFAULT_INTERVAL)
    }
}

impl CpuSampler {
    /// Create a sampler over `reader` with the given window
    pub fn new(reader: SystemReader, interval: Duration) -> Self {
        Self { reader, interval }
    }

    /// Sampler over the live system with a custom window
    pub fn with_interval(interval: Duration) -> Self {
        Self::new(SystemReader::default(), interval)
    }

    /// The sampling window
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Busy fraction of CPU time over one sampling window.
    ///
    /// Blocks the calling thread for `interval`. Returns
    /// [`Error::NoElapsedJiffies`] if the counters did not advance, and the
    /// read error if either sample cannot be taken.
    pub fn utilization(&self) -> Result<f64> {
        let before = self.reader.try_cpu_times()?;
        std::thread::sleep(self.interval);
        let after = self.reader.try_cpu_times()?;
        Self::ratio(&before, &after)
    }

    /// Utilization between two samples taken by the caller
    pub fn ratio(before: &CpuTime, after: &CpuTime) -> Result<f64> {
        let ratio = after
            .utilization_since(before)
            .ok_or(Error::NoElapsedJiffies)?;
        debug!(
            "cpu window: {} -> {} jiffies, utilization {:.4}",
            before.total(),
            after.total(),
            ratio
        );
        Ok(ratio)
    }
}
