//! Display-date helpers for the dashboard.
//!
//! Both formatters are lenient: malformed input never panics. Headline
//! displays fall back to `"N/A"`; chart axis labels fall back to the empty
//! string so the chart omits the label instead of showing a sentinel.

use chrono::{DateTime, NaiveDate};

/// Parse an ISO `YYYY-MM-DD` date. Full RFC 3339 timestamps are accepted
/// too, since correction dates occasionally carry a time component.
pub(crate) fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(d);
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.date_naive())
}

/// `"Month D, YYYY"`, e.g. `"January 5, 2024"`. Used for headline
/// "Last Updated" displays.
pub fn long_format(raw: Option<&str>) -> String {
    match raw.and_then(parse_date) {
        Some(d) => d.format("%B %-d, %Y").to_string(),
        None => "N/A".to_string(),
    }
}

/// `"M/D/YY"`, e.g. `"1/5/24"`. Used inside chart axis labels.
pub fn short_format(raw: Option<&str>) -> String {
    match raw.and_then(parse_date) {
        Some(d) => d.format("%-m/%-d/%y").to_string(),
        None => String::new(),
    }
}
