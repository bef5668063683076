//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and sets up logging
//! - loads settings from the environment and flags
//! - picks the manifest source (remote service or in-process builder)
//! - runs render cycles and prints charts, captions or JSON

use std::time::Duration;

use clap::Parser;
use tracing::{error, info};

use crate::cli::{Cli, Command, ManifestArgs, RenderArgs, SourceArgs};
use crate::config::Settings;
use crate::data::{FetchBase, HttpFetcher, HttpManifest, ManifestBuilder, ManifestSource};
use crate::error::{AppError, EXIT_CONFIG};
use crate::logging::{LogConfig, init_logging};

pub mod pipeline;

use pipeline::{CycleOutput, RenderContext};

/// Entry point for the `xp` binary.
pub fn run() -> Result<(), AppError> {
    // `xp` and `xp -e squat` behave like `xp render ...`. Clap requires a
    // subcommand name, so argv is rewritten before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = Cli::parse_from(argv);

    init_logging(&LogConfig::from_verbosity(cli.verbose, cli.log_format))?;

    match cli.command {
        Command::Render(args) => handle_render(args),
        Command::Manifest(args) => handle_manifest(args),
    }
}

fn load_settings(source: &SourceArgs) -> Result<Settings, AppError> {
    let mut settings = Settings::from_env()?;
    settings.apply_source_args(source)?;
    Ok(settings)
}

/// Manifest source plus the fetcher whose base matches it.
fn manifest_source(settings: &Settings) -> Result<(Box<dyn ManifestSource>, HttpFetcher), AppError> {
    match &settings.manifest_url {
        Some(url) => {
            info!(url = %url, "using remote manifest service");
            let fetcher = HttpFetcher::new(settings.fetch_timeout, FetchBase::Url(url.clone()))?;
            let manifest = HttpManifest::new(fetcher.client().clone(), url.clone());
            Ok((Box::new(manifest), fetcher))
        }
        None => {
            info!(dir = %settings.data_dir.display(), "building manifest in-process");
            let fetcher = HttpFetcher::new(settings.fetch_timeout, FetchBase::Dir(settings.data_dir.clone()))?;
            let builder = ManifestBuilder::new(
                fetcher.clone(),
                settings.drive_folder_id.clone(),
                settings.data_dir.clone(),
                settings.cache_ttl,
            );
            Ok((Box::new(builder), fetcher))
        }
    }
}

fn handle_render(args: RenderArgs) -> Result<(), AppError> {
    let mut settings = load_settings(&args.source)?;
    settings.prepend_sections(args.exercises.iter().map(String::as_str));
    if let Some(combined) = &args.combined {
        settings.combined_file = Some(combined.clone());
    }

    let (manifest, fetcher) = manifest_source(&settings)?;
    let ctx = RenderContext {
        manifest: &*manifest,
        fetcher: &fetcher,
        layout: &settings.layout,
        combined_file: settings.combined_file.as_deref(),
    };

    let Some(secs) = args.watch else {
        let cycle = pipeline::run_cycle(&ctx)?;
        return emit(&cycle, &args);
    };

    let interval = Duration::from_secs(secs.max(1));
    info!(interval_secs = interval.as_secs(), "watching for changes");
    loop {
        // A failed cycle leaves the previous output on screen; the next tick retries.
        match pipeline::run_cycle(&ctx).and_then(|cycle| emit(&cycle, &args)) {
            Ok(()) => {}
            Err(e) => error!(exit_code = e.exit_code(), "render cycle failed: {e}"),
        }
        std::thread::sleep(interval);
    }
}

fn emit(cycle: &CycleOutput, args: &RenderArgs) -> Result<(), AppError> {
    let views = cycle.views();

    if let Some(path) = &args.export {
        crate::io::write_views_json(path, &views)?;
        info!(path = %path.display(), exercises = views.len(), "exported views");
    }

    if args.json {
        println!("{}", crate::io::views_to_json(&views)?);
        return Ok(());
    }

    println!("{}", crate::report::format_cycle_summary(cycle));
    for ex in &cycle.exercises {
        print!("{}", crate::report::format_exercise(ex));
        if !args.no_plot {
            print!(
                "{}",
                crate::plot::render_series_plot(
                    &ex.view.values,
                    &ex.view.labels,
                    &ex.view.display_units,
                    args.width,
                    args.height,
                )
            );
        }
        println!();
    }

    Ok(())
}

fn handle_manifest(args: ManifestArgs) -> Result<(), AppError> {
    let settings = load_settings(&args.source)?;
    let fetcher = HttpFetcher::new(settings.fetch_timeout, FetchBase::Dir(settings.data_dir.clone()))?;
    let builder = ManifestBuilder::new(
        fetcher,
        settings.drive_folder_id.clone(),
        settings.data_dir.clone(),
        settings.cache_ttl,
    );

    let entries = builder.build()?;
    let json = serde_json::to_string_pretty(&entries)
        .map_err(|e| AppError::new(EXIT_CONFIG, format!("Failed to serialize manifest: {e}")))?;
    println!("{json}");
    Ok(())
}

/// Rewrite argv so `xp` defaults to `xp render`.
///
/// Rules:
/// - `xp`                      -> `xp render`
/// - `xp -e squat ...`         -> `xp render -e squat ...`
/// - `xp -v manifest ...`      -> unchanged (global flags before a subcommand)
/// - `xp --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("render".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let has_subcommand = argv.iter().skip(1).any(|arg| matches!(arg.as_str(), "render" | "manifest"));
    if has_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "render flags".
    if arg1.starts_with('-') {
        argv.insert(1, "render".to_string());
        return argv;
    }

    argv
}
