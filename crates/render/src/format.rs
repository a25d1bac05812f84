//! Cell formatting shared by every table.

use chrono::{DateTime, Local, TimeZone, Utc};
use chatdash_core::MISSING_VALUE;

const DISPLAY_DATETIME_FORMAT: &str = "%d.%m.%Y %H:%M:%S";

/// `DD.MM.YYYY HH:MM:SS` in the local time zone, or `N/A`.
#[must_use]
pub fn local_timestamp(at: Option<DateTime<Utc>>) -> String {
    timestamp_in(at, &Local)
}

/// `DD.MM.YYYY HH:MM:SS` in `tz`, or `N/A`.
#[must_use]
pub fn timestamp_in<Tz: TimeZone>(at: Option<DateTime<Utc>>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.map_or_else(
        || MISSING_VALUE.to_owned(),
        |at| at.with_timezone(tz).format(DISPLAY_DATETIME_FORMAT).to_string(),
    )
}

/// The value, or `N/A` when absent or blank.
#[must_use]
pub fn or_missing(value: Option<&str>) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(MISSING_VALUE)
        .to_owned()
}

/// Dollar amount with two decimals.
#[must_use]
pub fn dollars(amount: f64) -> String {
    format!("${amount:.2}")
}

/// Collapses whitespace runs (including newlines) into single spaces and
/// clips to `max_chars`, marking the cut with `...`.
#[must_use]
pub fn one_line(text: &str, max_chars: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let kept: String = flat.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{kept}...")
}
