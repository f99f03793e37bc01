//! Error types for saving and loading.

use std::path::PathBuf;

/// Alias for `Result<T, SaveError>`.
pub type SaveResult<T> = Result<T, SaveError>;

/// Errors from snapshot encoding and storage backends.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    /// Filesystem failure in a file-backed store.
    #[error("cannot access {path}: {source}")]
    Io {
        /// File or directory involved.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// Snapshot JSON could not be encoded or decoded.
    #[error("invalid snapshot: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The snapshot was written by an incompatible version.
    #[error("snapshot version {found} is not supported (expected {expected})")]
    VersionMismatch {
        /// Version found in the snapshot.
        found: u32,
        /// Version this build writes.
        expected: u32,
    },

    /// The backend has no room for the value.
    #[error("storage quota exceeded: {needed} bytes needed, limit is {limit}")]
    QuotaExceeded {
        /// Bytes the store would hold after the write.
        needed: usize,
        /// Configured limit.
        limit: usize,
    },

    /// Keys must be non-empty and safe to use as file names.
    #[error("invalid storage key: \"{0}\"")]
    InvalidKey(String),

    /// Every backend of a fallback chain failed.
    #[error("all storage backends failed: {primary}; {secondary}")]
    AllBackendsFailed {
        /// Error from the primary backend.
        primary: Box<SaveError>,
        /// Error from the secondary backend.
        secondary: Box<SaveError>,
    },
}
