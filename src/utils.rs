//! Small string and time helpers used by the adapters.

use chrono::{Local, SecondsFormat};

/// Keep at most `max` characters of `s`, appending `...` when anything was
/// cut. Counts characters, not bytes.
///
/// ```ignore
/// assert_eq!(truncate_chars("abcdef", 3), "abc...");
/// assert_eq!(truncate_chars("abc", 3), "abc");
/// ```
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &s[..cut]),
        None => s.to_string(),
    }
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to `max` bytes (backed off to a char boundary) with
/// `"…(+N bytes)"` appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Current local time as an ISO-8601 / RFC 3339 string with microseconds.
pub fn now_iso8601() -> String {
    Local::now().to_rfc3339_opts(SecondsFormat::Micros, false)
}
