use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::StoreError;

static DIGIT_GROUP: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());

fn split_elapsed(seconds: f64) -> (u64, u64, u64, u64) {
    let total = seconds.max(0.0).floor() as u64;
    let days = total / 86_400;
    let hours = (total % 86_400) / 3600;
    let minutes = (total % 3600) / 60;
    (days, hours, minutes, total % 60)
}

/// `"1d, 2h, 3m, 4s"`, as shown next to a progress bar.
pub fn format_elapsed_long(seconds: f64) -> String {
    let (d, h, m, s) = split_elapsed(seconds);
    format!("{d}d, {h}h, {m}m, {s}s")
}

/// `"1d 2h 3m 4s"`, as shown and persisted for a job row.
pub fn format_elapsed_short(seconds: f64) -> String {
    let (d, h, m, s) = split_elapsed(seconds);
    format!("{d}d {h}h {m}m {s}s")
}

/// Inverse of [`format_elapsed_short`]: takes the first four digit groups as
/// days, hours, minutes and seconds.
pub fn parse_elapsed_short(text: &str) -> Result<u64, StoreError> {
    let malformed = || StoreError::MalformedTime {
        value: text.to_string(),
    };
    let parts: Vec<u64> = DIGIT_GROUP
        .find_iter(text)
        .take(4)
        .map(|m| m.as_str().parse::<u64>())
        .collect::<Result<_, _>>()
        .map_err(|_| malformed())?;
    match parts.as_slice() {
        [d, h, m, s] => Ok(d * 86_400 + h * 3600 + m * 60 + s),
        _ => Err(malformed()),
    }
}
