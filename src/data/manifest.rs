//! Exercise manifest: which datasets exist and how they are labelled.
//!
//! Two sources implement `ManifestSource`:
//!
//! - `HttpManifest` queries a remote manifest service;
//! - `ManifestBuilder` builds the manifest in-process: Drive folder listing
//!   first (when configured), local data directory otherwise or on failure,
//!   with the result held in a short-lived cache.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use reqwest::Url;
use reqwest::blocking::Client;
use reqwest::header::CACHE_CONTROL;
use tracing::{debug, info, warn};

use crate::data::cache::TtlCache;
use crate::data::drive::build_from_drive;
use crate::data::fetch::Fetcher;
use crate::data::local::build_from_local;
use crate::domain::ManifestEntry;
use crate::error::ManifestError;

/// Something that can answer "which exercises exist?".
///
/// `None` means unavailable; callers fall through to their next strategy.
pub trait ManifestSource: Sync {
    fn fetch_manifest(&self) -> Option<Vec<ManifestEntry>>;
}

/// Remote manifest service.
#[derive(Debug, Clone)]
pub struct HttpManifest {
    client: Client,
    url: Url,
}

impl HttpManifest {
    pub fn new(client: Client, url: Url) -> Self {
        Self { client, url }
    }
}

impl ManifestSource for HttpManifest {
    fn fetch_manifest(&self) -> Option<Vec<ManifestEntry>> {
        let resp = match self
            .client
            .get(self.url.clone())
            .header(CACHE_CONTROL, "no-store")
            .send()
        {
            Ok(r) => r,
            Err(e) => {
                warn!(url = %self.url, error = %e, "manifest service unreachable");
                return None;
            }
        };

        if !resp.status().is_success() {
            warn!(url = %self.url, status = resp.status().as_u16(), "manifest service unavailable");
            return None;
        }

        let body: serde_json::Value = match resp.json() {
            Ok(v) => v,
            Err(e) => {
                warn!(url = %self.url, error = %e, "manifest response is not JSON");
                return None;
            }
        };

        let entries = parse_manifest(body);
        if let Some(entries) = &entries {
            debug!(url = %self.url, entries = entries.len(), "fetched manifest");
        }
        entries
    }
}

/// Decode a manifest body; anything other than an array of entries is `None`.
pub fn parse_manifest(body: serde_json::Value) -> Option<Vec<ManifestEntry>> {
    if !body.is_array() {
        debug!("manifest body is not a list");
        return None;
    }
    match serde_json::from_value(body) {
        Ok(entries) => Some(entries),
        Err(e) => {
            warn!(error = %e, "manifest entries could not be decoded");
            None
        }
    }
}

/// Builds the manifest in-process.
#[derive(Debug)]
pub struct ManifestBuilder<F> {
    fetcher: F,
    folder_id: Option<String>,
    data_dir: PathBuf,
    cache: TtlCache<Vec<ManifestEntry>>,
}

impl<F: Fetcher> ManifestBuilder<F> {
    pub fn new(fetcher: F, folder_id: Option<String>, data_dir: PathBuf, cache_ttl: Duration) -> Self {
        Self {
            fetcher,
            folder_id: folder_id.filter(|id| !id.trim().is_empty()),
            data_dir,
            cache: TtlCache::new(cache_ttl),
        }
    }

    /// Cached manifest, rebuilt when older than the cache TTL.
    pub fn manifest(&self) -> Result<Vec<ManifestEntry>, ManifestError> {
        self.manifest_at(Instant::now())
    }

    pub fn manifest_at(&self, now: Instant) -> Result<Vec<ManifestEntry>, ManifestError> {
        self.cache.get_or_refresh(now, || self.build())
    }

    /// Uncached build: Drive listing, falling back to the local directory.
    pub fn build(&self) -> Result<Vec<ManifestEntry>, ManifestError> {
        if let Some(folder_id) = &self.folder_id {
            match build_from_drive(&self.fetcher, folder_id) {
                Ok(entries) => {
                    info!(folder_id = %folder_id, exercises = entries.len(), "built manifest from Drive folder");
                    return Ok(entries);
                }
                Err(e) => warn!(error = %e, "Drive folder listing failed, falling back to local CSV files"),
            }
        }
        let entries = build_from_local(&self.data_dir)?;
        info!(dir = %self.data_dir.display(), exercises = entries.len(), "built manifest from local files");
        Ok(entries)
    }
}

impl<F: Fetcher> ManifestSource for ManifestBuilder<F> {
    fn fetch_manifest(&self) -> Option<Vec<ManifestEntry>> {
        match self.manifest() {
            Ok(entries) => Some(entries),
            Err(e) => {
                warn!(error = %e, "manifest could not be built");
                None
            }
        }
    }
}
