//! Fetch raw text from a data location.
//!
//! Locations are either absolute `http(s)` URLs or relative names. Relative
//! names resolve against a base: the manifest URL when the manifest came from
//! a remote service, otherwise the local data directory.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::Url;
use reqwest::blocking::Client;
use tracing::debug;

use crate::error::{AppError, EXIT_CONFIG, FetchError};

/// Query parameter appended to every remote fetch so caches never answer.
pub const CACHE_BUST_PARAM: &str = "cb";

/// Anything that can turn a location into text.
pub trait Fetcher: Sync {
    fn fetch_text(&self, location: &str) -> Result<String, FetchError>;
}

/// What relative locations are resolved against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchBase {
    Dir(PathBuf),
    Url(Url),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Target {
    Remote(Url),
    Local(PathBuf),
}

/// `reqwest`-backed fetcher that also reads local files.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    base: FetchBase,
}

impl HttpFetcher {
    pub fn new(timeout: Duration, base: FetchBase) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::new(EXIT_CONFIG, format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client, base })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    fn resolve(&self, location: &str) -> Result<Target, FetchError> {
        let location = location.trim();
        if location.is_empty() {
            return Err(FetchError::InvalidLocation {
                location: location.to_string(),
                reason: "empty location".to_string(),
            });
        }

        if is_http_url(location) {
            return Url::parse(location)
                .map(Target::Remote)
                .map_err(|e| invalid(location, e));
        }

        match &self.base {
            FetchBase::Url(base) => base
                .join(location)
                .map(Target::Remote)
                .map_err(|e| invalid(location, e)),
            FetchBase::Dir(dir) => Ok(Target::Local(dir.join(location))),
        }
    }
}

impl Fetcher for HttpFetcher {
    fn fetch_text(&self, location: &str) -> Result<String, FetchError> {
        match self.resolve(location)? {
            Target::Remote(mut url) => {
                append_cache_buster(&mut url, chrono::Utc::now().timestamp_millis());
                get_text(&self.client, &url)
            }
            Target::Local(path) => {
                debug!(path = %path.display(), "reading local data file");
                std::fs::read_to_string(&path).map_err(|source| FetchError::Read { path, source })
            }
        }
    }
}

/// GET `url` and return the body; any non-success status is an error.
pub fn get_text(client: &Client, url: &Url) -> Result<String, FetchError> {
    debug!(%url, "fetching");
    let resp = client.get(url.clone()).send().map_err(|source| FetchError::Request {
        url: url.to_string(),
        source,
    })?;

    let status = resp.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    resp.text().map_err(|source| FetchError::Request {
        url: url.to_string(),
        source,
    })
}

pub fn append_cache_buster(url: &mut Url, stamp_ms: i64) {
    url.query_pairs_mut()
        .append_pair(CACHE_BUST_PARAM, &stamp_ms.to_string());
}

pub fn is_http_url(location: &str) -> bool {
    let lower = location.get(..8).unwrap_or(location).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

fn invalid(location: &str, err: impl std::fmt::Display) -> FetchError {
    FetchError::InvalidLocation {
        location: location.to_string(),
        reason: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetcher(base: FetchBase) -> HttpFetcher {
        HttpFetcher::new(Duration::from_secs(1), base).unwrap()
    }

    #[test]
    fn cache_buster_is_appended_to_existing_query() {
        let mut url = Url::parse("https://docs.google.com/spreadsheets/d/abc/export?format=csv&gid=0").unwrap();
        append_cache_buster(&mut url, 1_700_000_000_000);
        assert_eq!(
            url.as_str(),
            "https://docs.google.com/spreadsheets/d/abc/export?format=csv&gid=0&cb=1700000000000"
        );

        let mut url = Url::parse("http://localhost:3000/squat.csv").unwrap();
        append_cache_buster(&mut url, 5);
        assert_eq!(url.as_str(), "http://localhost:3000/squat.csv?cb=5");
    }

    #[test]
    fn relative_locations_resolve_against_base() {
        let base = Url::parse("http://localhost:3000/api/exercises").unwrap();
        let f = fetcher(FetchBase::Url(base));
        assert_eq!(
            f.resolve("squat.csv").unwrap(),
            Target::Remote(Url::parse("http://localhost:3000/api/squat.csv").unwrap())
        );
        assert_eq!(
            f.resolve("/squat.csv").unwrap(),
            Target::Remote(Url::parse("http://localhost:3000/squat.csv").unwrap())
        );

        let f = fetcher(FetchBase::Dir(PathBuf::from("/data")));
        assert_eq!(f.resolve("squat.csv").unwrap(), Target::Local(PathBuf::from("/data/squat.csv")));
        assert_eq!(
            f.resolve("https://example.com/a.csv").unwrap(),
            Target::Remote(Url::parse("https://example.com/a.csv").unwrap())
        );
        assert!(f.resolve("  ").is_err());
    }

    #[test]
    fn reads_local_files_and_reports_missing_ones() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("squat.csv"), "exercise,ts,value\n").unwrap();
        let f = fetcher(FetchBase::Dir(dir.path().to_path_buf()));
        assert_eq!(f.fetch_text("squat.csv").unwrap(), "exercise,ts,value\n");
        assert!(matches!(f.fetch_text("missing.csv"), Err(FetchError::Read { .. })));
    }

    #[test]
    fn http_url_detection() {
        assert!(is_http_url("https://youtu.be/x"));
        assert!(is_http_url("HTTP://example.com"));
        assert!(!is_http_url("squat.csv"));
        assert!(!is_http_url("ftp://example.com"));
    }
}
