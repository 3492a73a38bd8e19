//! Alarm window check
//!
//! The alarm and scheduled power-on flag files hold a header line
//! followed by a decimal epoch timestamp in seconds. An alarm is imminent
//! when either timestamp falls strictly inside the window around now.

/// Earliest offset from now that still counts as imminent (exclusive, s)
pub const ALARM_WINDOW_BEFORE_S: i64 = -20;

/// Latest offset from now that still counts as imminent (exclusive, s)
pub const ALARM_WINDOW_AFTER_S: i64 = 180;

/// Flag files are read up to this many bytes
pub const FLAG_READ_LEN: usize = 30;

/// Marker of an erased flag file
const ERASED: u8 = 0xff;

/// Parse the timestamp out of a flag file
///
/// Returns `None` for an empty or erased file. A missing or non-numeric
/// second line parses as zero, which never lands in the window.
pub fn parse_flag_contents(contents: &[u8]) -> Option<i64> {
    let contents = &contents[..contents.len().min(FLAG_READ_LEN - 2)];
    if contents.first().map_or(true, |&b| b == ERASED) {
        return None;
    }

    let second_line = match contents.iter().position(|&b| b == b'\n') {
        Some(pos) => &contents[pos + 1..],
        None => &[],
    };

    let mut value: i64 = 0;
    for &b in second_line
        .iter()
        .skip_while(|b| b.is_ascii_whitespace())
        .take_while(|b| b.is_ascii_digit())
    {
        value = value.saturating_mul(10).saturating_add(i64::from(b - b'0'));
    }

    Some(value)
}

/// Check a single timestamp against the window
pub fn in_window(timestamp_s: i64, now_s: i64) -> bool {
    let delta = timestamp_s.saturating_sub(now_s);
    delta > ALARM_WINDOW_BEFORE_S && delta < ALARM_WINDOW_AFTER_S
}

/// Check if any of the flag timestamps is imminent
pub fn is_imminent(timestamps: &[Option<i64>], now_s: i64) -> bool {
    timestamps
        .iter()
        .flatten()
        .any(|&timestamp| in_window(timestamp, now_s))
}
