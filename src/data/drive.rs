//! Public Google Drive folder listing.
//!
//! There is no API key involved: the public folder page is fetched and file
//! ids (and, when present, titles) are scraped out of the HTML. Each file is
//! then downloaded as CSV through the spreadsheet export endpoint, with the
//! generic download endpoint as a fallback.

use std::collections::HashSet;
use std::sync::LazyLock;

use rayon::prelude::*;
use regex::Regex;
use tracing::{debug, warn};

use crate::data::fetch::Fetcher;
use crate::domain::ManifestEntry;
use crate::error::{FetchError, ManifestError};
use crate::io::parse_rows;
use crate::resolve::extract_row_meta;

const FOLDER_URL: &str = "https://drive.google.com/drive/folders/";

static FILE_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"/file/d/([a-zA-Z0-9_-]{10,})/[^"'<>]*"#).expect("file link regex")
});

static TITLE_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""title":\s*"([^"]+)",\s*"id":\s*"([a-zA-Z0-9_-]{10,})""#).expect("title/id regex")
});

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("whitespace regex"));

/// A file found in the folder listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriveFile {
    pub id: String,
    pub name: Option<String>,
}

impl DriveFile {
    /// Exercise key: the title with whitespace runs collapsed to `_`, lower-cased; else the id.
    pub fn key(&self) -> String {
        match &self.name {
            Some(name) => WHITESPACE_RE.replace_all(name, "_").to_lowercase(),
            None => self.id.clone(),
        }
    }
}

pub fn folder_url(folder_id: &str) -> String {
    format!("{FOLDER_URL}{folder_id}")
}

pub fn spreadsheet_export_url(file_id: &str) -> String {
    format!("https://docs.google.com/spreadsheets/d/{file_id}/export?format=csv&gid=0")
}

pub fn download_url(file_id: &str) -> String {
    format!("https://drive.google.com/uc?export=download&id={file_id}")
}

/// Extract file ids (first-seen order) and titles from folder page HTML.
pub fn scrape_folder_listing(html: &str) -> Vec<DriveFile> {
    let mut files: Vec<DriveFile> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for caps in FILE_LINK_RE.captures_iter(html) {
        let id = caps[1].to_string();
        if seen.insert(id.clone()) {
            files.push(DriveFile { id, name: None });
        }
    }

    for caps in TITLE_ID_RE.captures_iter(html) {
        let name = caps[1].to_string();
        let id = caps[2].to_string();
        if seen.insert(id.clone()) {
            files.push(DriveFile { id, name: Some(name) });
        } else if let Some(existing) = files.iter_mut().find(|f| f.id == id) {
            existing.name.get_or_insert(name);
        }
    }

    files
}

pub fn list_folder(fetcher: &dyn Fetcher, folder_id: &str) -> Result<Vec<DriveFile>, FetchError> {
    let html = fetcher.fetch_text(&folder_url(folder_id))?;
    let files = scrape_folder_listing(&html);
    debug!(folder_id, files = files.len(), "scraped Drive folder listing");
    Ok(files)
}

/// Download a file as CSV: spreadsheet export first, then plain download.
///
/// When both fail the export error is reported.
pub fn fetch_file_csv(fetcher: &dyn Fetcher, file_id: &str) -> Result<String, FetchError> {
    match fetcher.fetch_text(&spreadsheet_export_url(file_id)) {
        Ok(text) => Ok(text),
        Err(export_err) => {
            debug!(file_id, error = %export_err, "spreadsheet export failed, trying download URL");
            fetcher
                .fetch_text(&download_url(file_id))
                .map_err(|_| export_err)
        }
    }
}

/// Build manifest entries for every readable file in a public folder.
///
/// Files that cannot be downloaded are skipped; only a failed folder listing
/// is an error.
pub fn build_from_drive(fetcher: &dyn Fetcher, folder_id: &str) -> Result<Vec<ManifestEntry>, ManifestError> {
    let files = list_folder(fetcher, folder_id).map_err(|source| ManifestError::FolderListing {
        folder_id: folder_id.to_string(),
        source,
    })?;

    let entries = files
        .par_iter()
        .filter_map(|file| match fetch_file_csv(fetcher, &file.id) {
            Ok(text) => Some(entry_for_file(file, &text)),
            Err(e) => {
                warn!(file_id = %file.id, error = %e, "skipping Drive file");
                None
            }
        })
        .collect();

    Ok(entries)
}

fn entry_for_file(file: &DriveFile, csv_text: &str) -> ManifestEntry {
    let rows = parse_rows(csv_text, &file.id).unwrap_or_default();
    let meta = extract_row_meta(&rows);
    ManifestEntry {
        key: file.key(),
        file: Some(format!("{}.csv", file.id)),
        url: Some(spreadsheet_export_url(&file.id)),
        label: meta.label,
        units: meta.units,
    }
}
