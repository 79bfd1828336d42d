//! System memory accounting

use crate::error::{Error, Result};
use crate::platform::common::parse_token;
use serde::{Deserialize, Serialize};

/// Totals parsed from `/proc/meminfo`, in kB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryInfo {
    /// `MemTotal`
    pub total_kb: u64,
    /// `MemFree`
    pub free_kb: u64,
}

impl MemoryInfo {
    /// Parses `MemTotal` and `MemFree` from meminfo-formatted content.
    ///
    /// Keys may appear in any order; both must be present.
    pub fn parse(content: &str) -> Result<Self> {
        let mut total_kb: Option<u64> = None;
        let mut free_kb: Option<u64> = None;

        for line in content.lines() {
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() < 2 {
                continue;
            }
            match parts[0] {
                "MemTotal:" => total_kb = Some(parse_token(parts[1], "MemTotal")?),
                "MemFree:" => free_kb = Some(parse_token(parts[1], "MemFree")?),
                _ => {}
            }

            if total_kb.is_some() && free_kb.is_some() {
                break;
            }
        }

        Ok(Self {
            total_kb: total_kb.ok_or_else(|| Error::MissingField("MemTotal".to_string()))?,
            free_kb: free_kb.ok_or_else(|| Error::MissingField("MemFree".to_string()))?,
        })
    }

    /// `1 - free / total`; `0.0` when total is zero.
    pub fn utilization(&self) -> f64 {
        if self.total_kb == 0 {
            return 0.0;
        }
        1.0 - self.free_kb as f64 / self.total_kb as f64
    }

    /// Memory not reported free, in kB
    pub fn used_kb(&self) -> u64 {
        self.total_kb.saturating_sub(self.free_kb)
    }
}
