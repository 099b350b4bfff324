//! Timecard hours parsing.
//!
//! Time clocks export durations as `"9h 18m"`. Days with no punch are
//! exported as a dash placeholder.

use std::sync::OnceLock;

use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};

fn hours_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"(\d+)\s*h").expect("hours pattern is valid"))
}

fn minutes_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"(\d+)\s*m").expect("minutes pattern is valid"))
}

/// Returns true for blank cells and dash placeholders such as `"----"`.
pub fn is_hours_placeholder(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.is_empty() || trimmed.chars().all(|c| c == '-')
}

/// Parses a duration such as `"9h 18m"`, `"9h"` or `"18m"` to decimal hours,
/// rounded to two places.
///
/// Placeholders parse to zero. Returns `None` when the text has neither an
/// hour nor a minute component; callers treat that as zero with a warning.
///
/// # Example
///
/// ```
/// use salon_payroll::calculation::parse_hours;
/// use rust_decimal::Decimal;
///
/// assert_eq!(parse_hours("9h 18m"), Some(Decimal::new(930, 2)));
/// assert_eq!(parse_hours("----"), Some(Decimal::ZERO));
/// assert_eq!(parse_hours("nine hours"), None);
/// ```
pub fn parse_hours(raw: &str) -> Option<Decimal> {
    if is_hours_placeholder(raw) {
        return Some(Decimal::ZERO);
    }

    let component = |regex: &Regex| -> Option<Decimal> {
        regex
            .captures(raw)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<u64>().ok())
            .map(Decimal::from)
    };

    let hours = component(hours_regex());
    let minutes = component(minutes_regex());
    if hours.is_none() && minutes.is_none() {
        return None;
    }

    let total = hours.unwrap_or(Decimal::ZERO) + minutes.unwrap_or(Decimal::ZERO) / Decimal::from(60);
    Some(total.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}
