//! Airport directory error types.

use std::path::PathBuf;

/// Errors that can occur when loading the airport directory.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    /// The dataset file could not be read
    #[error("failed to read airport dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The dataset is not a JSON array of airports
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}
