//! Fixed-width time and number formatting for the status line, the summary
//! and the session log.

/// `MM:SS.d`, or `HH:MM:SS.d` once an hour has passed. The tenths digit is
/// truncated, never rounded.
pub fn format_elapsed(seconds: f64) -> String {
    let seconds = seconds.max(0.0);
    let whole = seconds.trunc() as u64;
    let hours = whole / 3600;
    let minutes = (whole % 3600) / 60;
    let secs = whole % 60;
    let tenths = ((seconds.fract() * 10.0) as u64).min(9);

    if hours > 0 {
        format!("{hours:02}:{minutes:02}:{secs:02}.{tenths}")
    } else {
        format!("{minutes:02}:{secs:02}.{tenths}")
    }
}

/// `MM:SS`, or `H:MM:SS` with an unpadded hour. Negative input reads as zero.
pub fn format_remaining(seconds: f64) -> String {
    let whole = seconds.max(0.0).trunc() as u64;
    let hours = whole / 3600;
    let minutes = (whole % 3600) / 60;
    let secs = whole % 60;

    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes:02}:{secs:02}")
    }
}

/// Shortest decimal form of a number of seconds: `30`, `1.5`, `0.25`.
pub fn format_compact(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}
