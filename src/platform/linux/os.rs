//! Host identity, uptime and memory

use super::{soft, SystemReader};
use crate::core::memory::MemoryInfo;
use crate::error::{Error, Result};
use crate::platform::common::{parse_token, read_first_line};
use std::fs;

impl SystemReader {
    /// `PRETTY_NAME` from the os-release file, or `""`
    pub fn operating_system(&self) -> String {
        soft(self.try_operating_system(), "operating system")
    }

    /// `PRETTY_NAME` from the os-release file, quotes removed
    pub fn try_operating_system(&self) -> Result<String> {
        let content = fs::read_to_string(&self.paths.os_release)?;
        content
            .lines()
            .filter_map(|line| line.split_once('='))
            .find(|(key, _)| key.trim() == "PRETTY_NAME")
            .map(|(_, value)| unquote(value.trim()).to_string())
            .ok_or_else(|| Error::MissingField("PRETTY_NAME".to_string()))
    }

    /// Kernel release (third token of `version`), or `""`
    pub fn kernel(&self) -> String {
        soft(self.try_kernel(), "kernel version")
    }

    /// Kernel release (third token of `version`)
    pub fn try_kernel(&self) -> Result<String> {
        // Format: "Linux version 6.5.0-14-generic (buildd@...) ..."
        let line = read_first_line(self.paths.system_file("version"))?;
        line.split_whitespace()
            .nth(2)
            .map(str::to_string)
            .ok_or_else(|| Error::MissingField("kernel release".to_string()))
    }

    /// Whole seconds since boot, or `0`
    pub fn uptime(&self) -> u64 {
        soft(self.try_uptime(), "uptime")
    }

    /// Whole seconds since boot, fractional part truncated
    pub fn try_uptime(&self) -> Result<u64> {
        // Format: "<uptime_seconds> <idle_seconds>"
        let line = read_first_line(self.paths.system_file("uptime"))?;
        let token = line
            .split_whitespace()
            .next()
            .ok_or_else(|| Error::MissingField("uptime".to_string()))?;
        let seconds: f64 = parse_token(token, "uptime")?;
        Ok(seconds as u64)
    }

    /// `1 - MemFree/MemTotal`, or `0.0`
    pub fn memory_utilization(&self) -> f64 {
        soft(self.try_memory_utilization(), "memory utilization")
    }

    /// `1 - MemFree/MemTotal`
    pub fn try_memory_utilization(&self) -> Result<f64> {
        Ok(self.try_memory_info()?.utilization())
    }

    /// `MemTotal` and `MemFree` in kB
    pub fn try_memory_info(&self) -> Result<MemoryInfo> {
        let content = fs::read_to_string(self.paths.system_file("meminfo"))?;
        MemoryInfo::parse(&content)
    }
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
        .unwrap_or(value)
}
