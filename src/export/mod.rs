//! Export file URL derivation and the config document that carries it.
//!
//! - [`UrlPattern`] - validated two-placeholder URL template
//! - [`build_export_files`] - one [`ExternalFile`] per export file name
//! - [`write_config`] / [`read_config`] - `external-files.json` persistence

mod config_file;
mod files;
mod pattern;

pub use config_file::{
    ConfigFileError, EXTERNAL_FILES_CONFIG_NAME, config_path, read_config, write_config,
};
pub use files::{EXPORT_FILE_NAMES, ExternalFile, FileAuth, build_export_files};
pub use pattern::{EXPORT_ENDPOINT_PATTERN, PatternError, UrlPattern};
