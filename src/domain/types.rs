//! Shared domain types.
//!
//! These types are values: every render cycle builds a fresh set and nothing
//! here is mutated after construction, apart from sorting a `Series` in place
//! while it is being grouped.

use serde::{Deserialize, Serialize};

/// One data row as sourced: column name -> raw string value.
///
/// Column order and case are preserved exactly as they appear in the header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    fields: Vec<(String, String)>,
}

impl RawRow {
    pub fn new(fields: Vec<(String, String)>) -> Self {
        Self { fields }
    }

    /// Raw value for a column, exactly as sourced.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    /// Trimmed value for a column, `None` when absent or blank.
    pub fn non_blank(&self, column: &str) -> Option<&str> {
        self.get(column).map(str::trim).filter(|v| !v.is_empty())
    }

    /// First non-blank value among several column aliases.
    pub fn first_non_blank(&self, aliases: &[&str]) -> Option<&str> {
        aliases.iter().find_map(|alias| self.non_blank(alias))
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn is_blank(&self) -> bool {
        self.fields.iter().all(|(_, value)| value.trim().is_empty())
    }
}

/// A single measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    /// Source-native timestamp text, kept for display.
    pub timestamp: String,
    pub value: f64,
    /// Raw video reference (link or id) as sourced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_ref: Option<String>,
}

/// A `DataPoint` tagged with the exercise it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedPoint {
    pub exercise: String,
    pub point: DataPoint,
}

/// Chronologically ordered measurements for one exercise.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub points: Vec<DataPoint>,
}

impl Series {
    pub fn new(points: Vec<DataPoint>) -> Self {
        Self { points }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// The most recent non-blank video reference, scanning newest first.
    pub fn latest_video_ref(&self) -> Option<&str> {
        self.points
            .iter()
            .rev()
            .filter_map(|p| p.video_ref.as_deref())
            .map(str::trim)
            .find(|v| !v.is_empty())
    }

    pub fn timestamps(&self) -> Vec<String> {
        self.points.iter().map(|p| p.timestamp.clone()).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }
}

/// Optional label/units hint from one metadata source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaHint {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub units: Option<String>,
}

impl MetaHint {
    pub fn is_complete(&self) -> bool {
        self.label.is_some() && self.units.is_some()
    }
}

/// Fully resolved display metadata. `label` is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExerciseMeta {
    pub key: String,
    pub label: String,
    pub units: String,
}

/// Where one exercise's data comes from, plus any metadata the source supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDescriptor {
    pub key: String,
    pub fetch_location: String,
    pub inline_meta: Option<MetaHint>,
}

/// Canonical embeddable video URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedLink {
    pub canonical_url: String,
}

/// One manifest entry as published by the manifest service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub key: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub units: Option<String>,
}

/// What the renderer receives for one exercise.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseView {
    pub key: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub display_label: String,
    pub display_units: String,
    /// Empty when the exercise has no usable video link.
    pub embed_url: String,
}

impl ExerciseView {
    /// Dataset caption: `Label (units)`, or just the label when units are empty.
    pub fn caption(&self) -> String {
        if self.display_units.is_empty() {
            self.display_label.clone()
        } else {
            format!("{} ({})", self.display_label, self.display_units)
        }
    }
}

/// Row accounting for one exercise's pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestStats {
    pub rows_read: usize,
    pub rows_used: usize,
    pub source_unavailable: bool,
}
