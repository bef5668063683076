//! One render cycle, shared by one-shot and `--watch` rendering.
//!
//! resolve sources -> (per exercise, in parallel) fetch -> parse -> normalize
//! -> group -> resolve metadata -> pick embed link
//!
//! Exercises are independent: a source that cannot be fetched or parsed yields
//! an empty series for that key and never affects its siblings.

use rayon::prelude::*;
use tracing::{debug, debug_span, warn};

use crate::data::{Fetcher, ManifestSource};
use crate::domain::{ExerciseMeta, ExerciseView, IngestStats, RawRow, Series, SourceDescriptor};
use crate::error::AppError;
use crate::io::{EXERCISE_COLUMN, group_by_exercise, normalize_rows, parse_rows};
use crate::resolve::{Layout, ResolveInput, extract_row_meta, resolve_meta, resolve_sources};
use crate::video::latest_embed;

/// Collaborators for a render cycle.
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    pub manifest: &'a dyn ManifestSource,
    pub fetcher: &'a dyn Fetcher,
    pub layout: &'a Layout,
    pub combined_file: Option<&'a str>,
}

/// Everything computed for one exercise.
#[derive(Debug, Clone)]
pub struct ExerciseOutput {
    pub meta: ExerciseMeta,
    pub series: Series,
    pub view: ExerciseView,
    pub stats: IngestStats,
}

/// All outputs of a single render cycle, in descriptor order.
#[derive(Debug, Clone)]
pub struct CycleOutput {
    pub strategy: &'static str,
    pub exercises: Vec<ExerciseOutput>,
}

impl CycleOutput {
    pub fn views(&self) -> Vec<ExerciseView> {
        self.exercises.iter().map(|e| e.view.clone()).collect()
    }
}

/// Run a full cycle. Fails only when there is nothing to render.
pub fn run_cycle(ctx: &RenderContext<'_>) -> Result<CycleOutput, AppError> {
    let manifest = ctx.manifest.fetch_manifest();
    let resolved = resolve_sources(&ResolveInput {
        manifest: manifest.as_deref(),
        layout: ctx.layout,
        combined_file: ctx.combined_file,
    })?;

    let exercises = resolved
        .descriptors
        .par_iter()
        .map(|descriptor| run_exercise(descriptor, ctx.fetcher, ctx.layout, ctx.combined_file))
        .collect();

    Ok(CycleOutput {
        strategy: resolved.strategy,
        exercises,
    })
}

/// Process one exercise end to end. Never fails.
///
/// `combined_file` is the file shared by every exercise, if any; row metadata
/// read from it only counts rows tagged with this exercise.
pub fn run_exercise(
    descriptor: &SourceDescriptor,
    fetcher: &dyn Fetcher,
    layout: &Layout,
    combined_file: Option<&str>,
) -> ExerciseOutput {
    let key = descriptor.key.as_str();
    let span = debug_span!("exercise", key);
    let _guard = span.enter();

    debug!(location = %descriptor.fetch_location, "fetching CSV");
    let parsed = match fetcher.fetch_text(&descriptor.fetch_location) {
        Ok(text) => parse_rows(&text, &descriptor.fetch_location),
        Err(e) => {
            warn!(key, error = %e, "source unavailable, rendering empty series");
            None
        }
    };
    let source_unavailable = parsed.is_none();
    let rows = parsed.unwrap_or_default();

    let normalized = normalize_rows(&rows);
    debug!(
        rows = normalized.rows_read,
        dropped = normalized.rows_dropped,
        "normalized rows"
    );

    let mut grouped = group_by_exercise(normalized.points);
    debug!(groups = ?grouped.keys().collect::<Vec<_>>(), "grouped rows");
    let series = grouped.remove(key).unwrap_or_default();

    let shared_file = combined_file.is_some_and(|file| file == descriptor.fetch_location);
    let row_meta = if shared_file {
        let own_rows: Vec<RawRow> = rows
            .iter()
            .filter(|row| row.non_blank(EXERCISE_COLUMN) == Some(key))
            .cloned()
            .collect();
        extract_row_meta(&own_rows)
    } else {
        extract_row_meta(&rows)
    };
    let meta = resolve_meta(key, descriptor.inline_meta.as_ref(), Some(&row_meta), layout.heading(key));

    let embed_url = latest_embed(&series)
        .map(|link| link.canonical_url)
        .unwrap_or_default();
    if embed_url.is_empty() {
        debug!("no embeddable video, clearing player");
    } else {
        debug!(embed = %embed_url, "latest video");
    }

    let view = ExerciseView {
        key: key.to_string(),
        labels: series.timestamps(),
        values: series.values(),
        display_label: meta.label.clone(),
        display_units: meta.units.clone(),
        embed_url,
    };

    let stats = IngestStats {
        rows_read: rows.len(),
        rows_used: series.len(),
        source_unavailable,
    };

    ExerciseOutput {
        meta,
        series,
        view,
        stats,
    }
}
