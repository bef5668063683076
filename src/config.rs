//! Runtime settings.
//!
//! Values come from the environment (a `.env` file is loaded first via
//! `dotenvy`) and may then be overridden by command-line flags.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::Url;

use crate::cli::SourceArgs;
use crate::error::{AppError, EXIT_CONFIG};
use crate::resolve::Layout;

pub const DEFAULT_CACHE_TTL_MS: u64 = 60_000;
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone)]
pub struct Settings {
    /// Remote manifest service; when unset the manifest is built in-process.
    pub manifest_url: Option<Url>,
    pub data_dir: PathBuf,
    pub drive_folder_id: Option<String>,
    pub cache_ttl: Duration,
    pub fetch_timeout: Duration,
    pub layout: Layout,
    pub combined_file: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            manifest_url: None,
            data_dir: PathBuf::from("."),
            drive_folder_id: None,
            cache_ttl: Duration::from_millis(DEFAULT_CACHE_TTL_MS),
            fetch_timeout: Duration::from_millis(DEFAULT_FETCH_TIMEOUT_MS),
            layout: Layout::default(),
            combined_file: None,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build settings from an arbitrary variable lookup (the environment in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut settings = Self::default();

        if let Some(url) = var("MANIFEST_URL") {
            settings.manifest_url = Some(parse_url("MANIFEST_URL", &url)?);
        }
        if let Some(dir) = var("DATA_DIR") {
            settings.data_dir = PathBuf::from(dir);
        }
        settings.drive_folder_id = var("GDRIVE_FOLDER_ID");
        if let Some(ms) = var("CACHE_TTL_MS") {
            settings.cache_ttl = parse_millis("CACHE_TTL_MS", &ms)?;
        }
        if let Some(ms) = var("FETCH_TIMEOUT_MS") {
            settings.fetch_timeout = parse_millis("FETCH_TIMEOUT_MS", &ms)?;
        }
        if let Some(list) = var("EXERCISES") {
            settings.layout = Layout::from_list(&list);
        }
        settings.combined_file = var("COMBINED_CSV");

        Ok(settings)
    }

    /// Command-line flags win over the environment.
    pub fn apply_source_args(&mut self, args: &SourceArgs) -> Result<(), AppError> {
        if let Some(url) = &args.manifest_url {
            self.manifest_url = Some(parse_url("--manifest-url", url)?);
        }
        if let Some(dir) = &args.data_dir {
            self.data_dir = dir.clone();
        }
        if let Some(id) = &args.folder_id {
            self.drive_folder_id = Some(id.clone());
        }
        if let Some(ms) = args.cache_ttl_ms {
            self.cache_ttl = Duration::from_millis(ms);
        }
        if let Some(ms) = args.timeout_ms {
            self.fetch_timeout = Duration::from_millis(ms);
        }
        Ok(())
    }

    /// Sections from `--exercise` flags come first, then those from `EXERCISES`.
    pub fn prepend_sections<'a>(&mut self, specs: impl IntoIterator<Item = &'a str>) {
        let from_flags = Layout::from_specs(specs);
        self.layout = from_flags.merge(std::mem::take(&mut self.layout));
    }
}

fn parse_url(name: &str, raw: &str) -> Result<Url, AppError> {
    Url::parse(raw).map_err(|e| AppError::new(EXIT_CONFIG, format!("Invalid {name} '{raw}': {e}")))
}

fn parse_millis(name: &str, raw: &str) -> Result<Duration, AppError> {
    raw.parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|_| AppError::new(EXIT_CONFIG, format!("Invalid {name} '{raw}': expected milliseconds.")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let s = Settings::from_lookup(lookup(&[])).unwrap();
        assert_eq!(s.manifest_url, None);
        assert_eq!(s.data_dir, PathBuf::from("."));
        assert_eq!(s.cache_ttl, Duration::from_secs(60));
        assert_eq!(s.fetch_timeout, Duration::from_secs(10));
        assert!(s.layout.is_empty());
    }

    #[test]
    fn reads_all_variables() {
        let s = Settings::from_lookup(lookup(&[
            ("MANIFEST_URL", "http://localhost:3000/api/exercises"),
            ("DATA_DIR", "/srv/data"),
            ("GDRIVE_FOLDER_ID", "abc"),
            ("CACHE_TTL_MS", "5000"),
            ("FETCH_TIMEOUT_MS", "250"),
            ("EXERCISES", "broad_jump=Broad Jump,squat"),
            ("COMBINED_CSV", "data.csv"),
        ]))
        .unwrap();
        assert_eq!(s.manifest_url.unwrap().path(), "/api/exercises");
        assert_eq!(s.data_dir, PathBuf::from("/srv/data"));
        assert_eq!(s.drive_folder_id.as_deref(), Some("abc"));
        assert_eq!(s.cache_ttl, Duration::from_millis(5000));
        assert_eq!(s.fetch_timeout, Duration::from_millis(250));
        assert_eq!(s.layout.heading("broad_jump"), Some("Broad Jump"));
        assert_eq!(s.combined_file.as_deref(), Some("data.csv"));
    }

    #[test]
    fn blank_values_are_unset() {
        let s = Settings::from_lookup(lookup(&[("GDRIVE_FOLDER_ID", "  "), ("MANIFEST_URL", "")])).unwrap();
        assert_eq!(s.drive_folder_id, None);
        assert_eq!(s.manifest_url, None);
    }

    #[test]
    fn invalid_numbers_are_config_errors() {
        let err = Settings::from_lookup(lookup(&[("CACHE_TTL_MS", "soon")])).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_CONFIG);
        assert!(err.message().contains("CACHE_TTL_MS"));
    }

    #[test]
    fn flags_override_environment() {
        let mut s = Settings::from_lookup(lookup(&[("DATA_DIR", "/env"), ("EXERCISES", "squat=Env Squat")])).unwrap();
        let args = SourceArgs {
            data_dir: Some(PathBuf::from("/flag")),
            cache_ttl_ms: Some(0),
            ..SourceArgs::default()
        };
        s.apply_source_args(&args).unwrap();
        s.prepend_sections(["squat=Flag Squat", "bench"]);
        assert_eq!(s.data_dir, PathBuf::from("/flag"));
        assert_eq!(s.cache_ttl, Duration::ZERO);
        assert_eq!(s.layout.keys().collect::<Vec<_>>(), vec!["squat", "bench"]);
        assert_eq!(s.layout.heading("squat"), Some("Flag Squat"));
    }
}
