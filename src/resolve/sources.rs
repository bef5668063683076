//! Decide which exercise datasets a render cycle processes.
//!
//! Strategies are tried in order; the first one that yields a non-empty list
//! of descriptors wins. When none does, the cycle has nothing to render.

use tracing::info;

use crate::domain::{ManifestEntry, MetaHint, SourceDescriptor};
use crate::error::AppError;
use crate::resolve::layout::Layout;

/// Everything the strategies may look at.
#[derive(Debug, Clone, Copy)]
pub struct ResolveInput<'a> {
    /// `None` when the manifest service was unavailable.
    pub manifest: Option<&'a [ManifestEntry]>,
    pub layout: &'a Layout,
    /// Single file holding every exercise's rows, if configured.
    pub combined_file: Option<&'a str>,
}

pub type Strategy = fn(&ResolveInput<'_>) -> Option<Vec<SourceDescriptor>>;

/// Resolution order.
pub const STRATEGIES: [(&str, Strategy); 2] = [("manifest", from_manifest), ("layout", from_layout)];

/// Descriptors plus the name of the strategy that produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSources {
    pub strategy: &'static str,
    pub descriptors: Vec<SourceDescriptor>,
}

pub fn resolve_sources(input: &ResolveInput<'_>) -> Result<ResolvedSources, AppError> {
    for (name, strategy) in STRATEGIES {
        if let Some(descriptors) = strategy(input) {
            info!(strategy = name, exercises = descriptors.len(), "resolved exercise sources");
            return Ok(ResolvedSources {
                strategy: name,
                descriptors,
            });
        }
    }
    Err(AppError::no_data_sources())
}

/// One descriptor per manifest entry with a non-empty key.
pub fn from_manifest(input: &ResolveInput<'_>) -> Option<Vec<SourceDescriptor>> {
    let descriptors: Vec<SourceDescriptor> = input
        .manifest?
        .iter()
        .filter(|entry| !entry.key.trim().is_empty())
        .map(|entry| {
            let key = entry.key.trim().to_string();
            let fetch_location = entry
                .url
                .as_deref()
                .or(entry.file.as_deref())
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| per_key_file(&key));
            SourceDescriptor {
                fetch_location,
                inline_meta: Some(MetaHint {
                    label: entry.label.clone(),
                    units: entry.units.clone(),
                }),
                key,
            }
        })
        .collect();

    non_empty(descriptors)
}

/// One descriptor per configured section, reading `<key>.csv` or the combined file.
pub fn from_layout(input: &ResolveInput<'_>) -> Option<Vec<SourceDescriptor>> {
    let descriptors: Vec<SourceDescriptor> = input
        .layout
        .keys()
        .map(|key| SourceDescriptor {
            key: key.to_string(),
            fetch_location: input
                .combined_file
                .map(str::to_string)
                .unwrap_or_else(|| per_key_file(key)),
            inline_meta: None,
        })
        .collect();

    non_empty(descriptors)
}

pub fn per_key_file(key: &str) -> String {
    format!("{key}.csv")
}

fn non_empty(descriptors: Vec<SourceDescriptor>) -> Option<Vec<SourceDescriptor>> {
    if descriptors.is_empty() { None } else { Some(descriptors) }
}
