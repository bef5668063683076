//! Data acquisition.
//!
//! - text fetching from URLs or the data directory (`fetch`)
//! - manifest sources, remote or built in-process (`manifest`)
//! - public Drive folder listing (`drive`) and local directory scan (`local`)
//! - the manifest's short-lived cache (`cache`)

pub mod cache;
pub mod drive;
pub mod fetch;
pub mod local;
pub mod manifest;

pub use cache::{CacheEntry, TtlCache};
pub use fetch::{FetchBase, Fetcher, HttpFetcher};
pub use manifest::{HttpManifest, ManifestBuilder, ManifestSource};
