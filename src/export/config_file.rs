//! Reading and writing the external-files config document.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, instrument};

use super::files::ExternalFile;

/// File name of the config document inside the input directory.
pub const EXTERNAL_FILES_CONFIG_NAME: &str = "external-files.json";

/// Errors while persisting or loading the config document.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// Creating, writing or reading the file failed.
    #[error("IO error on external files config {path}: {source}")]
    Io {
        /// Config path.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The descriptors could not be serialized.
    #[error("error encoding external file config to path {path}: {source}")]
    Encode {
        /// Config path.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The file on disk is not a valid config document.
    #[error("error decoding external file config {path}: {source}")]
    Decode {
        /// Config path.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

impl ConfigFileError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Path of the config document for an input directory.
#[must_use]
pub fn config_path(input_dir: &Path) -> PathBuf {
    input_dir.join(EXTERNAL_FILES_CONFIG_NAME)
}

/// Writes `files` as a JSON array to `path`, creating or truncating it.
///
/// The document is encoded before the file is touched, so an encoding
/// failure never leaves an empty config behind.
///
/// # Errors
///
/// Returns [`ConfigFileError::Encode`] or [`ConfigFileError::Io`].
#[instrument(skip(files), fields(path = %path.display(), count = files.len()))]
pub async fn write_config(path: &Path, files: &[ExternalFile]) -> Result<(), ConfigFileError> {
    let mut encoded = serde_json::to_vec(files).map_err(|source| ConfigFileError::Encode {
        path: path.to_path_buf(),
        source,
    })?;
    encoded.push(b'\n');

    let mut file = tokio::fs::File::create(path)
        .await
        .map_err(|e| ConfigFileError::io(path, e))?;
    file.write_all(&encoded)
        .await
        .map_err(|e| ConfigFileError::io(path, e))?;
    file.flush().await.map_err(|e| ConfigFileError::io(path, e))?;

    info!("wrote external files config");
    Ok(())
}

/// Loads a config document written by [`write_config`].
///
/// # Errors
///
/// Returns [`ConfigFileError::Io`] or [`ConfigFileError::Decode`].
pub async fn read_config(path: &Path) -> Result<Vec<ExternalFile>, ConfigFileError> {
    let raw = tokio::fs::read(path)
        .await
        .map_err(|e| ConfigFileError::io(path, e))?;
    let files: Vec<ExternalFile> =
        serde_json::from_slice(&raw).map_err(|source| ConfigFileError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
    debug!(path = %path.display(), count = files.len(), "read external files config");
    Ok(files)
}
