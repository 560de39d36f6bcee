//! Export file descriptors handed to the external-files fetcher.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::pattern::UrlPattern;

/// Export artifacts fetched for every dataset, in download order.
pub const EXPORT_FILE_NAMES: &[&str] = &["curation-export.json"];

/// Credentials attached to a single external file request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FileAuth {
    /// `Authorization: Bearer <token>`
    Bearer {
        /// Bearer token.
        token: String,
    },
    /// HTTP basic auth.
    Basic {
        /// User name.
        username: String,
        /// Password, if any.
        #[serde(default)]
        password: Option<String>,
    },
}

/// One entry of the external-files config: a named file and where to get it.
///
/// `auth` and `query` are always written, as `null` when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalFile {
    /// Fully resolved download URL.
    pub url: String,
    /// File name to save the download under.
    pub name: String,
    /// Optional request credentials.
    #[serde(default)]
    pub auth: Option<FileAuth>,
    /// Optional query parameters appended to `url`.
    #[serde(default)]
    pub query: Option<BTreeMap<String, String>>,
}

impl ExternalFile {
    /// Creates an entry with no auth and no query parameters.
    pub fn new(url: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            name: name.into(),
            auth: None,
            query: None,
        }
    }
}

/// Builds one descriptor per file name, preserving the order of `file_names`.
#[must_use]
pub fn build_export_files<S: AsRef<str>>(
    dataset_uuid: &str,
    pattern: &UrlPattern,
    file_names: &[S],
) -> Vec<ExternalFile> {
    file_names
        .iter()
        .map(|name| {
            let name = name.as_ref();
            let url = pattern.render(dataset_uuid, name);
            info!(url = %url, "added export file URL");
            ExternalFile::new(url, name)
        })
        .collect()
}
