//! Error types for catalog operations

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations
///
/// The display strings of [`StoreError::NotFound`] and
/// [`StoreError::Unavailable`] are returned verbatim to HTTP clients.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No burrow with the requested name
    #[error("burrow not found")]
    NotFound {
        /// Requested name
        name: String,
    },

    /// Burrow is already occupied or has collapsed
    #[error("burrow not available")]
    Unavailable {
        /// Requested name
        name: String,
    },

    /// Reading or writing a backing file failed
    #[error("{context} {}: {source}", .path.display())]
    Io {
        /// What was being attempted
        context: &'static str,
        /// File involved
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// State file is not a valid burrow array
    #[error("failed to unmarshal state data: {0}")]
    Decode(#[source] serde_json::Error),

    /// Catalog could not be serialized
    #[error("failed to marshal state: {0}")]
    Encode(#[source] serde_json::Error),
}

impl StoreError {
    pub(crate) fn io(context: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            context,
            path: path.into(),
            source,
        }
    }
}
