//! Error types for metadata export.

use std::path::PathBuf;

use thiserror::Error;

use crate::pennsieve::ApiError;

/// Errors raised while exporting dataset metadata.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// A model service call failed.
    #[error("metadata export failed: {0}")]
    Api(#[from] ApiError),

    /// Writing an exported document failed.
    #[error("IO error writing metadata to {path}: {source}")]
    Io {
        /// Target path.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// An exported document could not be re-encoded.
    #[error("error encoding metadata to {path}: {source}")]
    Encode {
        /// Target path.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The API host cannot be used as a base for model service URLs.
    #[error("invalid model service host: {url}")]
    InvalidUrl {
        /// The rejected host.
        url: String,
    },

    /// Two models map to the same records file.
    #[error("model {name:?} ({id}) collides with an earlier model's records file")]
    DuplicateModel {
        /// Model name.
        name: String,
        /// Model ID.
        id: String,
    },
}

impl MetadataError {
    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }
}
