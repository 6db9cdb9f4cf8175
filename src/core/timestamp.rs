//! Host timestamps are wall-clock ISO strings with an optional offset suffix.
//! The offset is dropped: the price schedule is planned in the market's local time.

use chrono::{DateTime, NaiveDateTime, TimeDelta, Timelike};

const NAIVE_FORMATS: [&str; 4] =
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"];

/// Parse the timestamp and strip its timezone suffix (`Z`, `+03:00`, `+0300`).
#[must_use]
pub fn parse(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(text) {
        return Some(timestamp.naive_local());
    }
    if let Ok(timestamp) = DateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%z") {
        return Some(timestamp.naive_local());
    }
    NAIVE_FORMATS.iter().find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
}

/// Move the end timestamp to the next day when it was labelled with the start's calendar date
/// although it lies past midnight.
#[must_use]
pub fn repair_seam(start: NaiveDateTime, end: NaiveDateTime) -> NaiveDateTime {
    if start.date() != end.date() {
        return end;
    }
    let wraps = end.hour() < start.hour() || (start.hour() >= 20 && end.hour() <= 2);
    if wraps { end + TimeDelta::days(1) } else { end }
}

/// Whole minutes between the timestamps after the seam repair, or `None` if not positive.
#[must_use]
pub fn minutes_between(start: NaiveDateTime, end: NaiveDateTime) -> Option<i64> {
    let minutes = (repair_seam(start, end) - start).num_minutes();
    (minutes > 0).then_some(minutes)
}
