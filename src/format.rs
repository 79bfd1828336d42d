//! Human-readable formatting helpers

/// Formats a count of seconds as `HH:MM:SS`.
///
/// Hours wrap every 24 hours, so `90000` seconds (25h) renders as `01:00:00`.
pub fn elapsed_time(seconds: u64) -> String {
    let hours = (seconds / 3600) % 24;
    let minutes = (seconds / 60) % 60;
    let secs = seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, secs)
}

/// Formats a utilization ratio as a percentage with one decimal.
pub fn percent(ratio: f64) -> String {
    if ratio.is_nan() {
        return "N/A".to_string();
    }
    format!("{:.1}%", ratio * 100.0)
}
