//! CSV text -> `RawRow`s.
//!
//! The parser is deliberately forgiving: ragged rows, blank lines and stray
//! trailing columns are all tolerated. A source that cannot be read at all
//! yields `None` so callers can treat it as "no data" and move on.

use csv::StringRecord;
use tracing::{debug, warn};

use crate::domain::RawRow;

/// Parse CSV text with a header row into ordered rows.
///
/// `source` is only used for log messages.
pub fn parse_rows(text: &str, source: &str) -> Option<Vec<RawRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = match reader.headers() {
        Ok(h) => header_names(h),
        Err(e) => {
            warn!(source, error = %e, "CSV header could not be read");
            return None;
        }
    };

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                // +2: header is line 1, records are 1-based.
                warn!(source, line = idx + 2, error = %e, "skipping unreadable CSV record");
                continue;
            }
        };

        let row = to_raw_row(&headers, &record);
        if row.is_blank() {
            continue;
        }
        rows.push(row);
    }

    debug!(source, columns = headers.len(), rows = rows.len(), "parsed CSV");
    Some(rows)
}

fn header_names(headers: &StringRecord) -> Vec<String> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            // Spreadsheet exports sometimes prefix the first header with a BOM.
            if idx == 0 {
                name.trim_start_matches('\u{feff}').to_string()
            } else {
                name.to_string()
            }
        })
        .collect()
}

fn to_raw_row(headers: &[String], record: &StringRecord) -> RawRow {
    // Short rows leave trailing columns absent; extra fields are ignored.
    let fields = headers
        .iter()
        .zip(record.iter())
        .map(|(name, value)| (name.clone(), value.to_string()))
        .collect();
    RawRow::new(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_header_and_rows_in_order() {
        let text = "exercise,ts,value\nbroad_jump,2024-01-01,24\nbroad_jump,2024-02-01,26\n";
        let rows = parse_rows(text, "test").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("ts"), Some("2024-01-01"));
        assert_eq!(rows[1].get("value"), Some("26"));
        assert_eq!(rows[0].columns().collect::<Vec<_>>(), vec!["exercise", "ts", "value"]);
    }

    #[test]
    fn skips_blank_lines_and_blank_records() {
        let text = "exercise,ts,value\n\nbroad_jump,2024-01-01,24\n,,\n\n";
        let rows = parse_rows(text, "test").unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn tolerates_ragged_rows() {
        let text = "exercise,ts,value,youtubeId\nbroad_jump,2024-01-01\nbroad_jump,2024-02-01,26,https://youtu.be/a,extra\n";
        let rows = parse_rows(text, "test").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("value"), None);
        assert_eq!(rows[1].get("youtubeId"), Some("https://youtu.be/a"));
    }

    #[test]
    fn preserves_header_case_and_strips_bom() {
        let text = "\u{feff}Exercise,youtubeID\nx,abc\n";
        let rows = parse_rows(text, "test").unwrap();
        assert_eq!(rows[0].get("Exercise"), Some("x"));
        assert_eq!(rows[0].get("exercise"), None);
        assert_eq!(rows[0].get("youtubeID"), Some("abc"));
    }

    #[test]
    fn quoted_fields_keep_commas() {
        let text = "exercise,label\nbroad_jump,\"Jump, broad\"\n";
        let rows = parse_rows(text, "test").unwrap();
        assert_eq!(rows[0].get("label"), Some("Jump, broad"));
    }

    #[test]
    fn empty_text_is_no_rows() {
        assert_eq!(parse_rows("", "test"), Some(vec![]));
    }
}
