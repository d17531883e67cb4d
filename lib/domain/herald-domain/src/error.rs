use std::path::PathBuf;

/// Failures of the deployment start-time store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("stored start time for deployment `{key}` is not a valid timestamp: {value}")]
    Corrupt { key: String, value: String },

    #[error("duration store file {path} is not a flat JSON object")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("duration store I/O failed for {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode duration store: {0}")]
    Encode(#[from] serde_json::Error),
}

impl StoreError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn is_corrupt(&self) -> bool {
        matches!(self, StoreError::Corrupt { .. })
    }
}
