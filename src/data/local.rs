//! Local data directory scan.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::domain::ManifestEntry;
use crate::error::ManifestError;
use crate::io::parse_rows;
use crate::resolve::extract_row_meta;

/// One manifest entry per `*.csv` file in `dir`, sorted by file name.
///
/// Unreadable files are skipped with a warning; an unreadable directory is an
/// error.
pub fn build_from_local(dir: &Path) -> Result<Vec<ManifestEntry>, ManifestError> {
    let read_dir = std::fs::read_dir(dir).map_err(|source| ManifestError::DataDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files: Vec<PathBuf> = read_dir
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && has_csv_extension(path))
        .collect();
    files.sort();

    let mut entries = Vec::with_capacity(files.len());
    for path in files {
        match entry_for_file(&path) {
            Ok(entry) => entries.push(entry),
            Err(e) => warn!(path = %path.display(), error = %e, "skipping local file"),
        }
    }

    debug!(dir = %dir.display(), exercises = entries.len(), "scanned local data directory");
    Ok(entries)
}

fn entry_for_file(path: &Path) -> Result<ManifestEntry, std::io::Error> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| std::io::Error::other("file name is not valid UTF-8"))?;
    let key = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name)
        .to_string();

    let content = std::fs::read_to_string(path)?;
    let rows = parse_rows(&content, file_name).unwrap_or_default();
    let meta = extract_row_meta(&rows);

    Ok(ManifestEntry {
        key,
        file: Some(file_name.to_string()),
        url: None,
        label: meta.label,
        units: meta.units,
    })
}

fn has_csv_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"))
}
