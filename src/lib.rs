//! # System Monitor (sysmon)
//!
//! Reads Linux kernel-exposed process and system statistics from `/proc`
//! and turns them into human-readable resource-usage figures: CPU load,
//! memory utilization, per-process elapsed time.
//!
//! ## Features
//!
//! - **System facts**: OS name, kernel release, uptime, memory utilization,
//!   process counts
//! - **Per-process facts**: command line, owner, resident memory, uptime,
//!   CPU jiffies
//! - **CPU sampling**: two-sample utilization over a caller-chosen window
//! - **Fail-soft accessors**: every reader returns a zero-valued default
//!   when a file is missing, with strict `try_*` variants alongside
//!
//! ## Quick Start
//!
//! ```no_run
//! use sysmon::{format::elapsed_time, Monitor, SystemReader};
//!
//! let reader = SystemReader::default();
//! println!("{} on {}", reader.operating_system(), reader.kernel());
//! println!("Up {}", elapsed_time(reader.uptime()));
//!
//! let snapshot = Monitor::new().snapshot();
//! println!("{}", snapshot.summary());
//! for proc in snapshot.processes.iter().take(5) {
//!     println!("{:>7} {:<10} {:>9} MB {}", proc.pid, proc.user, proc.ram_mb, proc.uptime);
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - the `sysmon` command-line binary

pub mod config; // Read-only TOML configuration
pub mod core;
pub mod error;
pub mod format; // HH:MM:SS and percentage formatting
pub mod platform;
pub mod sampler; // Two-sample CPU utilization
pub mod system; // Aggregated system snapshots

// Re-export main types
pub use crate::core::{cpu::CpuTime, memory::MemoryInfo, process::ProcessInfo};
pub use error::{Error, Result};
pub use platform::linux::{ProcPaths, SystemReader};
pub use sampler::CpuSampler;
pub use system::{Monitor, SystemSnapshot};

// Re-export configuration
pub use config::{Config, GeneralConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
