//! Date parsing and formatting for frontmatter and feed output.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use std::time::SystemTime;

/// Naive datetime layouts accepted after RFC 3339, interpreted as UTC.
const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

/// Parse a frontmatter date.
///
/// Accepts RFC 3339 (`2024-03-01T08:00:00+08:00`), a date with a naive time
/// (`2024-03-01 08:00`), or a bare date (`2024-03-01`). Naive values are UTC.
pub fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Some(naive) = NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
    {
        return Some(Utc.from_utc_datetime(&naive));
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

#[inline]
pub fn from_system_time(time: SystemTime) -> DateTime<Utc> {
    DateTime::<Utc>::from(time)
}

/// `Fri, 01 Mar 2024 00:00:00 GMT`
pub fn to_rfc2822(dt: &DateTime<Utc>) -> String {
    dt.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// `2024-03-01T00:00:00Z`
pub fn to_rfc3339(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}
