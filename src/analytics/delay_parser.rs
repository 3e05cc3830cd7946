//! Lenient parsing of the delay labels attached to stops.
//!
//! Anything that isn't understood counts as no delay, a broken label must
//! never take an aggregation down with it.

use std::sync::LazyLock;

use regex::Regex;

static LEADING_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([+-]?)\s*(\d+)").expect("valid leading number regex"));

static MINUTES_AFTER_HOURS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"h\D*?(\d+)\s*min").expect("valid compound delay regex"));

/// Returns the delay in seconds, 0 for anything unknown
pub fn parse_delay(label: Option<&str>) -> i64 {
    let Some(label) = label.map(str::trim) else {
        return 0;
    };
    if label.is_empty() || label.eq_ignore_ascii_case("on time") {
        return 0;
    }

    let Some((sign, magnitude)) = leading_number(label) else {
        return 0;
    };

    let seconds = if label.contains('h') {
        let minutes = MINUTES_AFTER_HOURS
            .captures(label)
            .and_then(|c| c[1].parse::<i64>().ok())
            .unwrap_or(0);
        magnitude
            .checked_mul(3600)
            .zip(minutes.checked_mul(60))
            .and_then(|(hours, minutes)| hours.checked_add(minutes))
    } else if label.contains("min") {
        magnitude.checked_mul(60)
    } else if label.contains("sec") {
        Some(magnitude)
    } else {
        None
    };

    // Out of range counts as unknown
    seconds.map_or(0, |s| sign * s)
}

pub fn parse_delay_minutes(label: Option<&str>) -> f64 {
    parse_delay(label) as f64 / 60.0
}

fn leading_number(label: &str) -> Option<(i64, i64)> {
    let captures = LEADING_NUMBER.captures(label)?;
    let sign = if &captures[1] == "-" { -1 } else { 1 };
    let magnitude = captures[2].parse::<i64>().ok()?;
    Some((sign, magnitude))
}
