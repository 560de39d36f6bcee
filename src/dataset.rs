//! Dataset node ID parsing.

use thiserror::Error;

/// Prefix carried by every dataset node ID.
pub const DATASET_NODE_ID_PREFIX: &str = "N:dataset:";

/// Errors from dataset node ID parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DatasetIdError {
    /// The ID does not start with [`DATASET_NODE_ID_PREFIX`].
    #[error("datasetID {dataset_id} missing expected prefix: {prefix}")]
    MissingPrefix {
        /// The offending ID.
        dataset_id: String,
        /// The prefix that was expected.
        prefix: &'static str,
    },
}

/// Strips [`DATASET_NODE_ID_PREFIX`] and returns the dataset's bare UUID.
///
/// # Errors
///
/// Returns [`DatasetIdError::MissingPrefix`] when the prefix is absent.
pub fn extract_dataset_uuid(dataset_id: &str) -> Result<&str, DatasetIdError> {
    dataset_id
        .strip_prefix(DATASET_NODE_ID_PREFIX)
        .ok_or_else(|| DatasetIdError::MissingPrefix {
            dataset_id: dataset_id.to_string(),
            prefix: DATASET_NODE_ID_PREFIX,
        })
}
