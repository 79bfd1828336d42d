//! Per-process facts: `/proc/<pid>/{stat,status,cmdline}` and user lookup

use super::{soft, soft_or, SystemReader};
use crate::core::process::ProcessInfo;
use crate::error::{Error, Result};
use crate::format::elapsed_time;
use crate::platform::common::{find_keyed_value, parse_token, read_first_line, read_lossy};
use log::debug;
use std::collections::BTreeSet;
use std::fs;

/// 1-indexed `stat` fields (see proc(5))
const STAT_UTIME: usize = 14;
const STAT_CSTIME: usize = 17;
const STAT_STARTTIME: usize = 22;

impl SystemReader {
    /// Live PIDs, or an empty set
    pub fn pids(&self) -> BTreeSet<u32> {
        soft(self.try_pids(), "process list")
    }

    /// Subdirectories of the proc root named entirely by decimal digits
    pub fn try_pids(&self) -> Result<BTreeSet<u32>> {
        let pids = fs::read_dir(self.proc_root())?
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
            .filter_map(|e| {
                let name = e.file_name();
                let name = name.to_str()?;
                if name.is_empty() || !name.chars().all(|c| c.is_ascii_digit()) {
                    return None;
                }
                name.parse::<u32>().ok()
            })
            .collect();
        Ok(pids)
    }

    /// utime + stime + cutime + cstime, or `0`
    pub fn process_active_jiffies(&self, pid: u32) -> u64 {
        soft(self.try_process_active_jiffies(pid), "process jiffies")
    }

    /// utime + stime + cutime + cstime (stat fields 14-17)
    pub fn try_process_active_jiffies(&self, pid: u32) -> Result<u64> {
        let stat = self.read_process_stat(pid)?;
        active_jiffies_from(&stat_fields(&stat)?)
    }

    /// Raw command line, or `""`
    pub fn command(&self, pid: u32) -> String {
        soft(self.try_command(pid), "command line")
    }

    /// First line of `cmdline`; argument separators are left as-is
    pub fn try_command(&self, pid: u32) -> Result<String> {
        read_first_line(self.paths.process_file(pid, "cmdline"))
    }

    /// Resident memory in MB, or `"0.0"`
    pub fn resident_memory(&self, pid: u32) -> String {
        soft_or(
            self.try_resident_memory(pid),
            "resident memory",
            "0.0".to_string(),
        )
    }

    /// `VmRSS` (kB) rendered as MB, 1 MB = 1000 kB
    pub fn try_resident_memory(&self, pid: u32) -> Result<String> {
        let kb: u64 = parse_token(&self.status_value(pid, "VmRSS:")?, "VmRSS")?;
        Ok(format_megabytes(kb))
    }

    /// Real UID, or `""`
    pub fn uid(&self, pid: u32) -> String {
        soft(self.try_uid(pid), "uid")
    }

    /// First value of the `Uid:` status line
    pub fn try_uid(&self, pid: u32) -> Result<String> {
        self.status_value(pid, "Uid:")
    }

    /// User name owning the process, or `""`
    pub fn user(&self, pid: u32) -> String {
        soft(self.try_user(pid), "user")
    }

    /// Resolve the process UID through the password database
    pub fn try_user(&self, pid: u32) -> Result<String> {
        let uid = self.try_uid(pid)?;
        let passwd = fs::read_to_string(&self.paths.passwd)?;
        lookup_user(&passwd, &uid)
            .map(str::to_string)
            .ok_or_else(|| Error::MissingField(format!("passwd entry for uid {}", uid)))
    }

    /// Seconds since the process started, or `0`
    pub fn process_uptime(&self, pid: u32) -> u64 {
        soft(self.try_process_uptime(pid), "process uptime")
    }

    /// System uptime minus process start time (stat field 22)
    pub fn try_process_uptime(&self, pid: u32) -> Result<u64> {
        let stat = self.read_process_stat(pid)?;
        let start_ticks = start_ticks_from(&stat_fields(&stat)?)?;
        Ok(self
            .try_uptime()?
            .saturating_sub(start_ticks / self.clock_ticks))
    }

    /// All per-process facts, or `None` if the process is gone
    pub fn process_info(&self, pid: u32) -> Option<ProcessInfo> {
        match self.try_process_info(pid) {
            Ok(info) => Some(info),
            Err(e) => {
                debug!("skipping pid {}: {}", pid, e);
                None
            }
        }
    }

    /// All per-process facts; fails only when `stat` cannot be read
    pub fn try_process_info(&self, pid: u32) -> Result<ProcessInfo> {
        let stat = self.read_process_stat(pid)?;
        let fields = stat_fields(&stat)?;
        let active = active_jiffies_from(&fields)?;
        let start_ticks = start_ticks_from(&fields)?;

        let uptime_seconds = self.uptime().saturating_sub(start_ticks / self.clock_ticks);
        let active_seconds = active as f64 / self.clock_ticks as f64;
        let cpu_utilization = if uptime_seconds > 0 {
            active_seconds / uptime_seconds as f64
        } else {
            0.0
        };

        Ok(ProcessInfo {
            pid,
            user: self.user(pid),
            command: self.command(pid),
            ram_mb: self.resident_memory(pid),
            uptime_seconds,
            uptime: elapsed_time(uptime_seconds),
            cpu_utilization,
        })
    }

    fn read_process_stat(&self, pid: u32) -> Result<String> {
        read_lossy(self.paths.process_file(pid, "stat"))
    }

    fn status_value(&self, pid: u32, key: &str) -> Result<String> {
        let status = read_lossy(self.paths.process_file(pid, "status"))?;
        find_keyed_value(&status, key)
            .map(str::to_string)
            .ok_or_else(|| Error::MissingField(key.to_string()))
    }
}

/// Split a `stat` line into fields, starting at field 3 (state).
///
/// Format: `pid (comm) state ...`. The command name can contain spaces and
/// parentheses, so fields are counted from the last `)`.
fn stat_fields(stat: &str) -> Result<Vec<&str>> {
    let end = stat
        .rfind(')')
        .ok_or_else(|| Error::Parse("No closing parenthesis in stat".to_string()))?;
    Ok(stat[end + 1..].split_whitespace().collect())
}

/// Field `n` (1-indexed, as in proc(5)) from the output of `stat_fields`
fn stat_field<'a>(fields: &[&'a str], n: usize) -> Result<&'a str> {
    fields
        .get(n - 3)
        .copied()
        .ok_or_else(|| Error::MissingField(format!("stat field {}", n)))
}

fn active_jiffies_from(fields: &[&str]) -> Result<u64> {
    (STAT_UTIME..=STAT_CSTIME).try_fold(0u64, |total, n| {
        let value: u64 = parse_token(stat_field(fields, n)?, "stat time")?;
        total
            .checked_add(value)
            .ok_or_else(|| Error::Parse("stat times overflow u64".to_string()))
    })
}

fn start_ticks_from(fields: &[&str]) -> Result<u64> {
    parse_token(stat_field(fields, STAT_STARTTIME)?, "starttime")
}

/// kB to MB using the divide-by-1000 rule, exact to three decimals
fn format_megabytes(kb: u64) -> String {
    format!("{}.{:03}", kb / 1000, kb % 1000)
}

/// Name of the `name:passwd:uid:...` entry whose uid matches
fn lookup_user<'a>(passwd: &'a str, uid: &str) -> Option<&'a str> {
    passwd.lines().find_map(|line| {
        let mut parts = line.split(':');
        let name = parts.next()?;
        let _placeholder = parts.next()?;
        (parts.next()? == uid).then_some(name)
    })
}

#[cfg(test)]
mod tests {
    use super::super::fixture::*;
    use super::*;

    #[test]
    fn test_pids() {
        let fake = populated();
        fake.write("proc/777", "a numeric file, not a directory\n");
        let pids: Vec<u32> = fake.reader().pids().into_iter().collect();
        assert_eq!(pids, vec![1, 4242]);
    }

    #[test]
    fn test_process_active_jiffies() {
        let fake = populated();
        let reader = fake.reader();
        assert_eq!(reader.process_active_jiffies(1), 300 + 200 + 400 + 100);
        assert_eq!(reader.process_active_jiffies(4242), 100);
    }

    #[test]
    fn test_process_with_non_utf8_name() {
        let fake = populated();
        fake.write_bytes(
            "proc/555/stat",
            b"555 (bad\xff) S 1 555 555 0 -1 4194560 100 0 0 0 \
              7 8 9 10 20 0 1 0 480000 1000000 200 0 0 0\n",
        )
        .write_bytes(
            "proc/555/status",
            b"Name:\tbad\xff\nUid:\t1000\t1000\t1000\t1000\nVmRSS:\t    2048 kB\n",
        )
        .write_bytes("proc/555/cmdline", b"bad\xff\0");

        let reader = fake.reader();
        assert_eq!(reader.process_active_jiffies(555), 34);
        assert_eq!(reader.process_uptime(555), 200);
        assert_eq!(reader.resident_memory(555), "2.048");
        assert_eq!(reader.uid(555), "1000");
        assert_eq!(reader.user(555), "alice");

        let info = reader.process_info(555).unwrap();
        assert_eq!(info.command, "bad\u{fffd}\u{0}");
        assert!(reader.pids().contains(&555));
    }

    #[test]
    fn test_process_active_jiffies_overflow() {
        let fake = FakeProc::new();
        fake.add_process(9, "huge", [u64::MAX, 1, 0, 0], 0, 0, 1, "huge\0");
        let reader = fake.reader();
        assert_eq!(reader.process_active_jiffies(9), 0);
        assert!(matches!(
            reader.try_process_active_jiffies(9),
            Err(Error::Parse(_))
        ));
    }

    #[test]
    fn test_process_active_jiffies_short_line() {
        let fake = FakeProc::new();
        fake.write("proc/5/stat", "5 (short) S 1 5 5 0\n");
        let reader = fake.reader();
        assert_eq!(reader.process_active_jiffies(5), 0);
        assert!(matches!(
            reader.try_process_active_jiffies(5),
            Err(Error::MissingField(_))
        ));
    }

    #[test]
    fn test_vanished_process() {
        let fake = populated();
        let reader = fake.reader();
        assert_eq!(reader.process_active_jiffies(99999), 0);
        assert!(reader
            .try_process_active_jiffies(99999)
            .unwrap_err()
            .is_unavailable());
    }

    #[test]
    fn test_command() {
        let fake = populated();
        assert_eq!(fake.reader().command(4242), "/usr/bin/app\0--flag\0");
    }

    #[test]
    fn test_resident_memory() {
        let fake = populated();
        let reader = fake.reader();
        assert_eq!(reader.resident_memory(1), "123.456");
        assert_eq!(reader.resident_memory(4242), "0.005");
        assert_eq!(reader.resident_memory(99999), "0.0");
    }

    #[test]
    fn test_format_megabytes() {
        assert_eq!(format_megabytes(0), "0.000");
        assert_eq!(format_megabytes(5), "0.005");
        assert_eq!(format_megabytes(42), "0.042");
        assert_eq!(format_megabytes(999), "0.999");
        assert_eq!(format_megabytes(1000), "1.000");
        assert_eq!(format_megabytes(123456), "123.456");
    }

    #[test]
    fn test_uid_and_user() {
        let fake = populated();
        let reader = fake.reader();
        assert_eq!(reader.uid(1), "0");
        assert_eq!(reader.user(1), "root");
        assert_eq!(reader.uid(4242), "1000");
        assert_eq!(reader.user(4242), "alice");
    }

    #[test]
    fn test_user_unknown_uid() {
        let fake = populated();
        fake.add_process(77, "ghost", [0, 0, 0, 0], 0, 4321, 1, "ghost");
        assert_eq!(fake.reader().user(77), "");
        assert_eq!(fake.reader().uid(77), "4321");
    }

    #[test]
    fn test_lookup_user() {
        assert_eq!(lookup_user(PASSWD, "1"), Some("daemon"));
        assert_eq!(lookup_user(PASSWD, "10"), None);
        assert_eq!(lookup_user("broken-line\n", "0"), None);
    }

    #[test]
    fn test_process_uptime() {
        let fake = populated();
        let reader = fake.reader();
        // uptime 5000s, started at 10_000 ticks / 100 Hz = 100s
        assert_eq!(reader.process_uptime(1), 4900);
        assert_eq!(reader.process_uptime(4242), 100);
        assert_eq!(reader.process_uptime(99999), 0);
    }

    #[test]
    fn test_process_uptime_saturates() {
        let fake = populated();
        fake.add_process(8, "future", [0, 0, 0, 0], 900_000, 0, 1, "future");
        assert_eq!(fake.reader().process_uptime(8), 0);
    }

    #[test]
    fn test_stat_fields_with_odd_comm() {
        let stat = "4242 (my (odd) app) S 1 2 3";
        let fields = stat_fields(stat).unwrap();
        assert_eq!(stat_field(&fields, 3).unwrap(), "S");
        assert_eq!(stat_field(&fields, 4).unwrap(), "1");
        assert!(stat_field(&fields, 22).is_err());
    }

    #[test]
    fn test_process_info() {
        let fake = populated();
        let info = fake.reader().process_info(4242).unwrap();
        assert_eq!(info.pid, 4242);
        assert_eq!(info.user, "alice");
        assert_eq!(info.ram_mb, "0.005");
        assert_eq!(info.uptime_seconds, 100);
        assert_eq!(info.uptime, "00:01:40");
        // 100 jiffies = 1s of CPU over 100s of uptime
        assert!((info.cpu_utilization - 0.01).abs() < 1e-9);
    }

    #[test]
    fn test_process_info_zero_uptime() {
        let fake = populated();
        fake.add_process(8, "fresh", [5, 0, 0, 0], 500_000, 0, 1, "fresh");
        let info = fake.reader().process_info(8).unwrap();
        assert_eq!(info.uptime_seconds, 0);
        assert_eq!(info.cpu_utilization, 0.0);
    }

    #[test]
    fn test_process_info_vanished() {
        let fake = populated();
        assert!(fake.reader().process_info(99999).is_none());
    }
}
