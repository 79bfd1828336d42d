//! Linux procfs system-facts reader
//!
//! Every accessor opens its backing file fresh on each call; nothing is
//! cached between calls. Accessors come in two flavours:
//!
//! - soft (`kernel()`, `uptime()`, ...) never fail and fall back to a
//!   zero-valued default (`""`, `0`, `0.0`) when the file is missing or
//!   malformed;
//! - strict (`try_kernel()`, `try_uptime()`, ...) report why a value could
//!   not be read.
//!
//! The free functions at the bottom of this module read the live system
//! through [`SystemReader::default`].

mod os;
mod process;
mod stat;

pub use stat::parse_cpu_times;

use crate::core::cpu::CpuTime;
use crate::core::process::ProcessInfo;
use crate::error::Result;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Clock ticks per second assumed when `sysconf` cannot report it
pub const DEFAULT_CLOCK_TICKS: u64 = 100;

/// Locations of the files the reader parses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcPaths {
    /// Root of the process-information pseudo-filesystem
    pub proc_root: PathBuf,
    /// OS release file (`KEY="value"` lines)
    pub os_release: PathBuf,
    /// Password database
    pub passwd: PathBuf,
}

impl Default for ProcPaths {
    fn default() -> Self {
        Self {
            proc_root: PathBuf::from("/proc"),
            os_release: PathBuf::from("/etc/os-release"),
            passwd: PathBuf::from("/etc/passwd"),
        }
    }
}

impl ProcPaths {
    /// Path of a system-wide file under the proc root, e.g. `stat`
    pub fn system_file(&self, name: &str) -> PathBuf {
        self.proc_root.join(name)
    }

    /// Path of a per-process file, e.g. `/proc/<pid>/status`
    pub fn process_file(&self, pid: u32, name: &str) -> PathBuf {
        self.proc_root.join(pid.to_string()).join(name)
    }
}

/// Typed accessors over kernel-exposed text files
#[derive(Debug, Clone)]
pub struct SystemReader {
    paths: ProcPaths,
    clock_ticks: u64,
}

impl Default for SystemReader {
    fn default() -> Self {
        Self::new(ProcPaths::default())
    }
}

impl SystemReader {
    /// Create a reader over the given paths, using the system clock tick rate
    pub fn new(paths: ProcPaths) -> Self {
        Self::with_clock_ticks(paths, system_clock_ticks())
    }

    /// Create a reader with an explicit clock tick rate
    pub fn with_clock_ticks(paths: ProcPaths, clock_ticks: u64) -> Self {
        Self {
            paths,
            clock_ticks: clock_ticks.max(1),
        }
    }

    /// Files this reader parses
    pub fn paths(&self) -> &ProcPaths {
        &self.paths
    }

    /// Clock ticks per second used to convert jiffies to seconds
    pub fn clock_ticks(&self) -> u64 {
        self.clock_ticks
    }

    fn proc_root(&self) -> &Path {
        &self.paths.proc_root
    }
}

/// Unwrap a strict read, logging and defaulting on failure
fn soft<T: Default>(result: Result<T>, what: &str) -> T {
    soft_or(result, what, T::default())
}

fn soft_or<T>(result: Result<T>, what: &str, fallback: T) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            debug!("{} unavailable, using default: {}", what, e);
            fallback
        }
    }
}

#[cfg(unix)]
fn system_clock_ticks() -> u64 {
    use nix::unistd::{sysconf, SysconfVar};

    match sysconf(SysconfVar::CLK_TCK) {
        Ok(Some(ticks)) if ticks > 0 => ticks as u64,
        other => {
            warn!(
                "sysconf(_SC_CLK_TCK) unavailable ({:?}), assuming {}",
                other, DEFAULT_CLOCK_TICKS
            );
            DEFAULT_CLOCK_TICKS
        }
    }
}

#[cfg(not(unix))]
fn system_clock_ticks() -> u64 {
    warn!("clock tick rate unknown on this platform, assuming {}", DEFAULT_CLOCK_TICKS);
    DEFAULT_CLOCK_TICKS
}

/// `PRETTY_NAME` from `/etc/os-release`
pub fn operating_system() -> String {
    SystemReader::default().operating_system()
}

/// Kernel release from `/proc/version`
pub fn kernel() -> String {
    SystemReader::default().kernel()
}

/// Live PIDs under `/proc`
pub fn pids() -> BTreeSet<u32> {
    SystemReader::default().pids()
}

/// System memory utilization from `/proc/meminfo`
pub fn memory_utilization() -> f64 {
    SystemReader::default().memory_utilization()
}

/// Whole seconds since boot
pub fn uptime() -> u64 {
    SystemReader::default().uptime()
}

/// Total system jiffies
pub fn jiffies() -> u64 {
    SystemReader::default().jiffies()
}

/// Busy system jiffies
pub fn active_jiffies() -> u64 {
    SystemReader::default().active_jiffies()
}

/// Idle system jiffies
pub fn idle_jiffies() -> u64 {
    SystemReader::default().idle_jiffies()
}

/// Aggregate CPU time sample
pub fn cpu_times() -> CpuTime {
    SystemReader::default().cpu_times()
}

/// Processes created since boot
pub fn total_processes() -> u64 {
    SystemReader::default().total_processes()
}

/// Processes currently runnable
pub fn running_processes() -> u32 {
    SystemReader::default().running_processes()
}

/// Jiffies consumed by a process and its waited-for children
pub fn process_active_jiffies(pid: u32) -> u64 {
    SystemReader::default().process_active_jiffies(pid)
}

/// Raw command line of a process
pub fn command(pid: u32) -> String {
    SystemReader::default().command(pid)
}

/// Resident memory of a process in MB
pub fn resident_memory(pid: u32) -> String {
    SystemReader::default().resident_memory(pid)
}

/// Real UID of a process
pub fn uid(pid: u32) -> String {
    SystemReader::default().uid(pid)
}

/// User name owning a process
pub fn user(pid: u32) -> String {
    SystemReader::default().user(pid)
}

/// Seconds since a process started
pub fn process_uptime(pid: u32) -> u64 {
    SystemReader::default().process_uptime(pid)
}

/// All per-process facts for one PID
pub fn process_info(pid: u32) -> Option<ProcessInfo> {
    SystemReader::default().process_info(pid)
}

/// Fake proc trees for tests
#[cfg(test)]
pub(crate) mod fixture {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    pub(crate) const CLOCK_TICKS: u64 = 100;

    /// A temporary directory laid out like `/proc` plus `/etc`
    pub(crate) struct FakeProc {
        dir: TempDir,
    }

    impl FakeProc {
        pub(crate) fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            fs::create_dir_all(dir.path().join("proc")).unwrap();
            fs::create_dir_all(dir.path().join("etc")).unwrap();
            Self { dir }
        }

        pub(crate) fn paths(&self) -> ProcPaths {
            ProcPaths {
                proc_root: self.dir.path().join("proc"),
                os_release: self.dir.path().join("etc/os-release"),
                passwd: self.dir.path().join("etc/passwd"),
            }
        }

        pub(crate) fn reader(&self) -> SystemReader {
            SystemReader::with_clock_ticks(self.paths(), CLOCK_TICKS)
        }

        /// Write a file relative to the fake root, e.g. `proc/stat`
        pub(crate) fn write(&self, rel: &str, content: &str) -> &Self {
            self.write_bytes(rel, content.as_bytes())
        }

        /// Write raw bytes, for contents that are not valid UTF-8
        pub(crate) fn write_bytes(&self, rel: &str, content: &[u8]) -> &Self {
            let path = self.dir.path().join(rel);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(path, content).unwrap();
            self
        }

        /// Write `/proc/<pid>/{stat,status,cmdline}`
        #[allow(clippy::too_many_arguments)]
        pub(crate) fn add_process(
            &self,
            pid: u32,
            comm: &str,
            jiffies: [u64; 4],
            start_ticks: u64,
            uid: u32,
            rss_kb: u64,
            cmdline: &str,
        ) -> &Self {
            let [utime, stime, cutime, cstime] = jiffies;
            let stat = format!(
                "{pid} ({comm}) S 1 {pid} {pid} 0 -1 4194560 100 0 0 0 \
                 {utime} {stime} {cutime} {cstime} 20 0 1 0 {start_ticks} 1000000 200 \
                 18446744073709551615 0 0 0 0 0 0 0 0 0 0 0 0 17 0 0 0 0 0 0\n"
            );
            let status = format!(
                "Name:\t{comm}\nState:\tS (sleeping)\nPid:\t{pid}\n\
                 Uid:\t{uid}\t{uid}\t{uid}\t{uid}\nGid:\t{uid}\t{uid}\t{uid}\t{uid}\n\
                 VmRSS:\t{rss_kb:>8} kB\nThreads:\t1\n"
            );
            self.write(&format!("proc/{}/stat", pid), &stat);
            self.write(&format!("proc/{}/status", pid), &status);
            self.write(&format!("proc/{}/cmdline", pid), cmdline);
            self
        }
    }

    pub(crate) const STAT: &str = "\
cpu  10 20 30 40 50 60 70 80 0 0
cpu0 5 10 15 20 25 30 35 40 0 0
cpu1 5 10 15 20 25 30 35 40 0 0
intr 1000 0 0
ctxt 8290126
btime 1700000000
processes 31337
procs_running 3
procs_blocked 0
";

    pub(crate) const PASSWD: &str = "\
root:x:0:0:root:/root:/bin/bash
daemon:x:1:1:daemon:/usr/sbin:/usr/sbin/nologin
alice:x:1000:1000:Alice,,,:/home/alice:/bin/bash
";

    /// A populated fake host: two processes, uptime 5000s
    pub(crate) fn populated() -> FakeProc {
        let fake = FakeProc::new();
        fake.write(
            "etc/os-release",
            "NAME=\"Ubuntu\"\nVERSION=\"22.04.3 LTS (Jammy Jellyfish)\"\nID=ubuntu\n\
             PRETTY_NAME=\"Ubuntu 22.04.3 LTS\"\nVERSION_ID=\"22.04\"\n",
        )
        .write(
            "proc/version",
            "Linux version 6.5.0-14-generic (buildd@lcy02-amd64-031) (gcc 12.3.0) #14-Ubuntu SMP\n",
        )
        .write("proc/meminfo", "MemTotal: 1000 kB\nMemFree: 250 kB\nMemAvailable: 600 kB\n")
        .write("proc/uptime", "5000.87 19000.12\n")
        .write("proc/stat", STAT)
        .write("etc/passwd", PASSWD)
        .add_process(1, "systemd", [300, 200, 400, 100], 10_000, 0, 123456, "/sbin/init\0splash\0")
        .add_process(4242, "my (odd) app", [50, 50, 0, 0], 490_000, 1000, 5, "/usr/bin/app\0--flag\0");
        fake.write("proc/self/stat", "not a pid directory\n");
        fake.write("proc/sys/kernel/hostname", "fakehost\n");
        fake
    }
}
