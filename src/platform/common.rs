//! Common platform utilities

use crate::error::{Error, Result};
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Read the first line of a file, without the trailing newline
pub fn read_first_line<P: AsRef<Path>>(path: P) -> Result<String> {
    let bytes = fs::read(path)?;
    let line = bytes.split(|b| *b == b'\n').next().unwrap_or(&[]);
    Ok(String::from_utf8_lossy(line).into_owned())
}

/// Read a whole file as text, replacing invalid UTF-8.
///
/// A process can rename itself to arbitrary bytes, and that name shows up
/// in `/proc/<pid>/stat` and `/proc/<pid>/status`.
pub fn read_lossy<P: AsRef<Path>>(path: P) -> Result<String> {
    let bytes = fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Find the value following `key` on the first line whose first
/// whitespace-delimited token equals `key`.
///
/// Works for `procfs` layouts such as `processes 1234` (`/proc/stat`) and
/// `VmRSS:\t  5 kB` (`/proc/<pid>/status`).
pub fn find_keyed_value<'a>(content: &'a str, key: &str) -> Option<&'a str> {
    content.lines().find_map(|line| {
        let mut parts = line.split_whitespace();
        if parts.next()? == key {
            parts.next()
        } else {
            None
        }
    })
}

/// Parse a token, naming the source in the error
pub fn parse_token<T>(token: &str, what: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    token
        .parse()
        .map_err(|e| Error::Parse(format!("Failed to parse {} from '{}': {}", what, token, e)))
}
