use std::path::PathBuf;

use thiserror::Error;

/// Exit code for configuration or invalid input.
pub const EXIT_CONFIG: u8 = 2;
/// Exit code when a render cycle has nothing to render.
pub const EXIT_NO_DATA: u8 = 3;
/// Exit code for network and I/O failures.
pub const EXIT_IO: u8 = 4;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    /// No manifest entries and no layout sections: nothing can be rendered.
    pub fn no_data_sources() -> Self {
        Self::new(
            EXIT_NO_DATA,
            "No exercise data sources found: the manifest is empty or unavailable and no \
             exercise sections are configured. Add CSV files to the data directory, set \
             MANIFEST_URL, or pass --exercise KEY.",
        )
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// A data location could not be read.
///
/// Every variant is recoverable: the affected exercise renders with an empty
/// series and the rest of the cycle carries on.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid location '{location}': {reason}")]
    InvalidLocation { location: String, reason: String },
}

/// Failures while building the exercise manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to list Drive folder {folder_id}: {source}")]
    FolderListing {
        folder_id: String,
        #[source]
        source: FetchError,
    },

    #[error("failed to read data directory {path}: {source}")]
    DataDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<ManifestError> for AppError {
    fn from(err: ManifestError) -> Self {
        AppError::new(EXIT_IO, err.to_string())
    }
}
