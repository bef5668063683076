//! Export rendered exercise views to JSON.
//!
//! The file holds exactly what a chart front-end needs per exercise: point
//! labels, values, display label/units and the embed URL.

use std::fs::File;
use std::path::Path;

use crate::domain::ExerciseView;
use crate::error::{AppError, EXIT_CONFIG};

/// Write views as a pretty-printed JSON array.
pub fn write_views_json(path: &Path, views: &[ExerciseView]) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::new(
            EXIT_CONFIG,
            format!("Failed to create export JSON '{}': {e}", path.display()),
        )
    })?;

    serde_json::to_writer_pretty(file, views)
        .map_err(|e| AppError::new(EXIT_CONFIG, format!("Failed to write export JSON: {e}")))?;

    Ok(())
}

/// Serialize views to a JSON string (for stdout).
pub fn views_to_json(views: &[ExerciseView]) -> Result<String, AppError> {
    serde_json::to_string_pretty(views)
        .map_err(|e| AppError::new(EXIT_CONFIG, format!("Failed to serialize views: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> ExerciseView {
        ExerciseView {
            key: "broad_jump".to_string(),
            labels: vec!["2024-01-01".to_string()],
            values: vec![24.0],
            display_label: "Broad Jump".to_string(),
            display_units: "inch".to_string(),
            embed_url: String::new(),
        }
    }

    #[test]
    fn json_uses_camel_case_fields() {
        let json = views_to_json(&[view()]).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[0]["displayLabel"], "Broad Jump");
        assert_eq!(parsed[0]["displayUnits"], "inch");
        assert_eq!(parsed[0]["embedUrl"], "");
        assert_eq!(parsed[0]["values"][0], 24.0);
    }

    #[test]
    fn writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("views.json");
        write_views_json(&path, &[view()]).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"key\": \"broad_jump\""));
    }
}
