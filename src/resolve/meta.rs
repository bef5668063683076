//! Display metadata resolution.
//!
//! Label and units resolve independently; for each, the first non-empty
//! candidate wins:
//!
//! 1. descriptor metadata (manifest entry)
//! 2. `label` / `units` columns in the exercise's own rows
//! 3. layout heading (label only)
//! 4. fallback: key with `_` -> ` ` for the label, empty units

use crate::domain::{ExerciseMeta, MetaHint, RawRow};

pub const LABEL_COLUMN: &str = "label";
pub const UNITS_COLUMN: &str = "units";

/// Scan rows for inline `label`/`units`; the first non-blank value of each wins.
pub fn extract_row_meta(rows: &[RawRow]) -> MetaHint {
    let mut hint = MetaHint::default();
    for row in rows {
        if hint.label.is_none() {
            hint.label = row.non_blank(LABEL_COLUMN).map(str::to_string);
        }
        if hint.units.is_none() {
            hint.units = row.non_blank(UNITS_COLUMN).map(str::to_string);
        }
        if hint.is_complete() {
            break;
        }
    }
    hint
}

/// Resolve display metadata for `key` from the available candidates.
pub fn resolve_meta(
    key: &str,
    descriptor: Option<&MetaHint>,
    rows: Option<&MetaHint>,
    heading: Option<&str>,
) -> ExerciseMeta {
    let fallback_label = fallback_label(key);

    let label = first_non_empty([
        descriptor.and_then(|m| m.label.as_deref()),
        rows.and_then(|m| m.label.as_deref()),
        heading,
        Some(fallback_label.as_str()),
    ])
    .unwrap_or(key);

    let units = first_non_empty([
        descriptor.and_then(|m| m.units.as_deref()),
        rows.and_then(|m| m.units.as_deref()),
    ])
    .unwrap_or("");

    ExerciseMeta {
        key: key.to_string(),
        label: label.to_string(),
        units: units.to_string(),
    }
}

pub fn fallback_label(key: &str) -> String {
    key.replace('_', " ")
}

fn first_non_empty<'a, const N: usize>(candidates: [Option<&'a str>; N]) -> Option<&'a str> {
    candidates
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
}
