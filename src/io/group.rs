//! Bucket tagged points by exercise and order each bucket chronologically.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::domain::{DataPoint, Series, TaggedPoint};

const DATETIME_FMTS: [&str; 8] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%d %b %Y %H:%M:%S",
];

const DATE_FMTS: [&str; 5] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d %b %Y", "%b %d, %Y"];

/// Group points by exercise key; each series is sorted ascending by time.
pub fn group_by_exercise(points: Vec<TaggedPoint>) -> BTreeMap<String, Series> {
    let mut out: BTreeMap<String, Series> = BTreeMap::new();
    for tagged in points {
        out.entry(tagged.exercise).or_default().points.push(tagged.point);
    }
    for series in out.values_mut() {
        sort_series(series);
    }
    out
}

/// Stable chronological sort. Unparsable timestamps go last, in input order.
pub fn sort_series(series: &mut Series) {
    // Parse each timestamp once; `sort_by` is stable.
    let mut keyed: Vec<(Option<NaiveDateTime>, DataPoint)> = series
        .points
        .drain(..)
        .map(|p| (parse_timestamp(&p.timestamp), p))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| compare_parsed(a.as_ref(), b.as_ref()));
    series.points = keyed.into_iter().map(|(_, p)| p).collect();
}

fn compare_parsed(a: Option<&NaiveDateTime>, b: Option<&NaiveDateTime>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Parse a source timestamp for ordering purposes only.
///
/// Date-only values are treated as midnight. Offsets in RFC 3339 values are
/// normalized to UTC.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for fmt in DATETIME_FMTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    for fmt in DATE_FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    None
}
