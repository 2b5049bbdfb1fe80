//! Storage-specific error type wrapping IO and JSON errors.

use std::path::PathBuf;

use minirelay_domain::error::MiniRelayError;
use minirelay_domain::id::SwitchId;

/// Errors originating from the JSON storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Reading or writing the file failed.
    #[error("io error on {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file does not hold a valid configuration tree.
    #[error("JSON (de)serialization error")]
    Json(#[from] serde_json::Error),

    /// The tree has no slot with this id.
    #[error("unknown switch {0}")]
    UnknownSwitch(SwitchId),
}

impl From<StorageError> for MiniRelayError {
    fn from(err: StorageError) -> Self {
        Self::Storage(Box::new(err))
    }
}
