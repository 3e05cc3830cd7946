use std::sync::LazyLock;

use chrono::NaiveTime;
use regex::Regex;

static NOT_COORDINATE_CHAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^-\d.]").expect("valid coordinate regex"));

/// Strips everything but digits, sign and decimal point, then parses what's left.
///
/// Feeds sometimes hand out coordinates like `"48.8566°"` or `" 2,35 "`.
pub fn sanitize_coordinate(raw: &str) -> Option<f64> {
    let cleaned = NOT_COORDINATE_CHAR.replace_all(raw, "");
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parses a local clock time given as `HH:mm` or `HH:mm:ss`
pub fn parse_clock_time(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .ok()
}

/// Rounds halves toward positive infinity, so -0.5 becomes 0 and 0.5 becomes 1
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
