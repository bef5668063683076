//! `RawRow` -> `TaggedPoint` normalization.
//!
//! Rows missing a required field are dropped, never defaulted:
//! - exercise identity (`exercise`, trimmed, non-empty)
//! - timestamp (first non-blank of `ts`, `date`, `timestamp`)
//! - numeric, finite `value`
//!
//! The video reference (`youtubeId`, `youtubeID`, `youtube`) is optional.

use crate::domain::{DataPoint, RawRow, TaggedPoint};

pub const EXERCISE_COLUMN: &str = "exercise";
pub const VALUE_COLUMN: &str = "value";
pub const TIMESTAMP_ALIASES: [&str; 3] = ["ts", "date", "timestamp"];
pub const VIDEO_ALIASES: [&str; 3] = ["youtubeId", "youtubeID", "youtube"];

/// Normalized points plus row accounting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Normalized {
    pub points: Vec<TaggedPoint>,
    pub rows_read: usize,
    pub rows_dropped: usize,
}

/// Normalize every row, keeping input order.
pub fn normalize_rows(rows: &[RawRow]) -> Normalized {
    let mut points = Vec::with_capacity(rows.len());
    for row in rows {
        if let Some(p) = normalize_row(row) {
            points.push(p);
        }
    }
    Normalized {
        rows_read: rows.len(),
        rows_dropped: rows.len() - points.len(),
        points,
    }
}

/// Normalize a single row, `None` when any required field is missing.
pub fn normalize_row(row: &RawRow) -> Option<TaggedPoint> {
    let exercise = row.non_blank(EXERCISE_COLUMN)?;
    let timestamp = source_timestamp(row)?;
    let value = parse_value(row.get(VALUE_COLUMN)?)?;
    let video_ref = row.first_non_blank(&VIDEO_ALIASES).map(str::to_string);

    Some(TaggedPoint {
        exercise: exercise.to_string(),
        point: DataPoint {
            timestamp: timestamp.to_string(),
            value,
            video_ref,
        },
    })
}

/// Timestamp text exactly as sourced, from the first alias with a non-blank value.
fn source_timestamp(row: &RawRow) -> Option<&str> {
    TIMESTAMP_ALIASES
        .iter()
        .find(|alias| row.non_blank(alias).is_some())
        .and_then(|alias| row.get(alias))
}

fn parse_value(raw: &str) -> Option<f64> {
    let v = raw.trim().parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn row(fields: &[(&str, &str)]) -> RawRow {
        RawRow::new(
            fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn keeps_complete_row() {
        let p = normalize_row(&row(&[
            ("exercise", " broad_jump "),
            ("ts", "2024-01-01"),
            ("value", "24"),
        ]))
        .unwrap();
        assert_eq!(p.exercise, "broad_jump");
        assert_eq!(p.point.timestamp, "2024-01-01");
        assert!((p.point.value - 24.0).abs() < 1e-12);
        assert_eq!(p.point.video_ref, None);
    }

    #[test]
    fn timestamp_aliases_in_priority_order() {
        let p = normalize_row(&row(&[
            ("exercise", "x"),
            ("ts", ""),
            ("date", "2024-03-01"),
            ("timestamp", "2024-04-01"),
            ("value", "1"),
        ]))
        .unwrap();
        assert_eq!(p.point.timestamp, "2024-03-01");

        let p = normalize_row(&row(&[("exercise", "x"), ("timestamp", "2024-04-01"), ("value", "1")])).unwrap();
        assert_eq!(p.point.timestamp, "2024-04-01");
    }

    #[test]
    fn timestamp_text_is_kept_as_sourced() {
        let p = normalize_row(&row(&[("exercise", "x"), ("ts", " 2024-01-01 09:30 "), ("value", "1")])).unwrap();
        assert_eq!(p.point.timestamp, " 2024-01-01 09:30 ");
    }

    #[test]
    fn video_aliases_in_priority_order() {
        let p = normalize_row(&row(&[
            ("exercise", "x"),
            ("ts", "2024-01-01"),
            ("value", "1"),
            ("youtube", "https://youtu.be/c"),
            ("youtubeID", "https://youtu.be/b"),
        ]))
        .unwrap();
        assert_eq!(p.point.video_ref.as_deref(), Some("https://youtu.be/b"));
    }

    #[test]
    fn drops_rows_missing_required_fields() {
        let cases = [
            row(&[("ts", "2024-01-01"), ("value", "1")]),
            row(&[("exercise", "  "), ("ts", "2024-01-01"), ("value", "1")]),
            row(&[("exercise", "x"), ("value", "1")]),
            row(&[("exercise", "x"), ("ts", "2024-01-01")]),
            row(&[("exercise", "x"), ("ts", "2024-01-01"), ("value", "abc")]),
            row(&[("exercise", "x"), ("ts", "2024-01-01"), ("value", "24kg")]),
            row(&[("exercise", "x"), ("ts", "2024-01-01"), ("value", "NaN")]),
            row(&[("exercise", "x"), ("ts", "2024-01-01"), ("value", "inf")]),
        ];
        for case in &cases {
            assert_eq!(normalize_row(case), None, "row should be dropped: {case:?}");
        }

        let out = normalize_rows(&cases);
        assert_eq!(out.rows_read, cases.len());
        assert_eq!(out.rows_dropped, cases.len());
        assert!(out.points.is_empty());
    }

    proptest! {
        #[test]
        fn valid_rows_yield_exactly_one_point(
            exercise in "[a-z_]{1,12}",
            day in 1u32..28,
            value in -1.0e6f64..1.0e6,
        ) {
            let ts = format!("2024-01-{day:02}");
            let value_text = value.to_string();
            let r = row(&[("exercise", &exercise), ("ts", &ts), ("value", &value_text)]);
            let out = normalize_rows(std::slice::from_ref(&r));
            prop_assert_eq!(out.points.len(), 1);
            prop_assert_eq!(&out.points[0].exercise, &exercise);
            prop_assert_eq!(out.points[0].point.value, value);
        }

        #[test]
        fn rows_without_value_yield_nothing(
            exercise in "[a-z_]{1,12}",
            junk in "[a-zA-Z ]{0,8}",
        ) {
            let r = row(&[("exercise", &exercise), ("ts", "2024-01-01"), ("value", &junk)]);
            prop_assume!(junk.trim().parse::<f64>().is_err());
            prop_assert!(normalize_rows(std::slice::from_ref(&r)).points.is_empty());
        }
    }
}
