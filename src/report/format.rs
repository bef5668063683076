//! Formatted terminal output.
//!
//! Formatting lives in one place so the pipeline stays free of presentation
//! concerns and output changes stay localized.

use crate::app::pipeline::{CycleOutput, ExerciseOutput};

/// Format the cycle overview: which strategy resolved sources plus one table row per exercise.
pub fn format_cycle_summary(cycle: &CycleOutput) -> String {
    let mut out = String::new();

    out.push_str("=== xp - Exercise Progress ===\n");
    out.push_str(&format!(
        "Sources: {} | exercises={}\n\n",
        cycle.strategy,
        cycle.exercises.len()
    ));

    out.push_str(format!("{:<24} {:>6} {:>6} {:>12} {:<6}", "exercise", "points", "rows", "latest", "video").trim_end());
    out.push('\n');
    out.push_str(format!("{:-<24} {:-<6} {:-<6} {:-<12} {:-<6}", "", "", "", "", "").trim_end());
    out.push('\n');

    for ex in &cycle.exercises {
        let video = if ex.stats.source_unavailable {
            "n/a"
        } else if ex.view.embed_url.is_empty() {
            "no"
        } else {
            "yes"
        };
        let latest = ex
            .view
            .values
            .last()
            .map(|v| fmt_value(*v))
            .unwrap_or_else(|| "-".to_string());
        out.push_str(
            format!(
                "{:<24} {:>6} {:>6} {:>12} {:<6}",
                truncate(&ex.view.key, 24),
                ex.stats.rows_used,
                ex.stats.rows_read,
                latest,
                video,
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

/// Format one exercise's caption block (shown above its chart).
pub fn format_exercise(ex: &ExerciseOutput) -> String {
    let view = &ex.view;
    let mut out = String::new();

    out.push_str(&format!("{}\n", view.caption()));
    out.push_str(&format!(
        "key: {} | points={} rows={}\n",
        view.key, ex.stats.rows_used, ex.stats.rows_read
    ));

    match (view.labels.last(), view.values.last()) {
        (Some(ts), Some(v)) if view.display_units.is_empty() => {
            out.push_str(&format!("latest: {} @ {ts}\n", fmt_value(*v)));
        }
        (Some(ts), Some(v)) => {
            out.push_str(&format!("latest: {} {} @ {ts}\n", fmt_value(*v), view.display_units));
        }
        _ => out.push_str("latest: -\n"),
    }

    if view.embed_url.is_empty() {
        out.push_str("video: none\n");
    } else {
        out.push_str(&format!("video: {}\n", view.embed_url));
    }

    if ex.stats.source_unavailable {
        out.push_str("note: source unavailable, showing an empty series\n");
    }

    out
}

fn fmt_value(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{v:.0}")
    } else {
        format!("{v:.2}")
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
