//! Command-line parsing for the exercise progress renderer.
//!
//! Argument parsing and command dispatch stay separate from the pipeline code.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::logging::LogFormat;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "xp",
    version,
    about = "Exercise progress charts from spreadsheet exports"
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log output format.
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty, global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Resolve exercise sources, load every dataset, and render charts.
    Render(RenderArgs),
    /// Build the exercise manifest (Drive folder or local CSV files) and print it as JSON.
    Manifest(ManifestArgs),
}

/// Where data comes from. Every flag overrides its environment variable.
#[derive(Debug, Clone, Default, Args)]
pub struct SourceArgs {
    /// Remote manifest service URL (env: MANIFEST_URL).
    #[arg(long, value_name = "URL")]
    pub manifest_url: Option<String>,

    /// Directory holding per-exercise CSV files (env: DATA_DIR).
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Public Google Drive folder to list (env: GDRIVE_FOLDER_ID).
    #[arg(long, value_name = "ID")]
    pub folder_id: Option<String>,

    /// Manifest cache lifetime in milliseconds (env: CACHE_TTL_MS).
    #[arg(long, value_name = "MS")]
    pub cache_ttl_ms: Option<u64>,

    /// HTTP timeout in milliseconds (env: FETCH_TIMEOUT_MS).
    #[arg(long, value_name = "MS")]
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Args)]
pub struct RenderArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Exercise section `KEY` or `KEY=Heading`; repeatable (env: EXERCISES, comma separated).
    #[arg(short = 'e', long = "exercise", value_name = "KEY[=HEADING]")]
    pub exercises: Vec<String>,

    /// Single CSV holding every exercise's rows, used for configured sections (env: COMBINED_CSV).
    #[arg(long, value_name = "FILE")]
    pub combined: Option<String>,

    /// Print the presentation tuples as JSON instead of charts.
    #[arg(long)]
    pub json: bool,

    /// Also write the presentation tuples to a JSON file.
    #[arg(long, value_name = "PATH")]
    pub export: Option<PathBuf>,

    /// Skip the terminal charts (captions only).
    #[arg(long)]
    pub no_plot: bool,

    /// Chart width (columns).
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Chart height (rows).
    #[arg(long, default_value_t = 12)]
    pub height: usize,

    /// Re-render every N seconds until interrupted.
    #[arg(long, value_name = "SECS")]
    pub watch: Option<u64>,
}

#[derive(Debug, Clone, Args)]
pub struct ManifestArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_render_flags() {
        let cli = Cli::parse_from([
            "xp", "render", "-e", "broad_jump=Broad Jump", "-e", "squat", "--json", "--data-dir", "/data", "-vv",
        ]);
        assert_eq!(cli.verbose, 2);
        let Command::Render(args) = cli.command else {
            panic!("expected render");
        };
        assert_eq!(args.exercises, vec!["broad_jump=Broad Jump", "squat"]);
        assert!(args.json);
        assert_eq!(args.source.data_dir, Some(PathBuf::from("/data")));
        assert_eq!(args.width, 72);
    }

    #[test]
    fn parses_manifest_flags() {
        let cli = Cli::parse_from(["xp", "--log-format", "json", "manifest", "--folder-id", "abc"]);
        assert_eq!(cli.log_format, LogFormat::Json);
        let Command::Manifest(args) = cli.command else {
            panic!("expected manifest");
        };
        assert_eq!(args.source.folder_id.as_deref(), Some("abc"));
    }
}
