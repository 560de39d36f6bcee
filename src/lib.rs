//! TTL sync pre-processor library.
//!
//! Given an integration ID, this crate resolves the integration's dataset,
//! derives the dataset's curation export URLs, writes them to an
//! `external-files.json` config and downloads them into the input directory.
//! Dataset metadata can optionally be exported alongside.
//!
//! # Architecture
//!
//! - [`pennsieve`] - Authenticated platform API client and integration lookup
//! - [`dataset`] - Dataset node ID parsing
//! - [`export`] - Export URL templates, descriptors and the config document
//! - [`fetch`] - Downloader for the files listed in the config document
//! - [`metadata`] - Dataset metadata export
//! - [`pipeline`] - The step orchestrator
//! - [`config`] - Environment configuration

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod dataset;
pub mod export;
pub mod fetch;
pub mod http;
pub mod metadata;
pub mod pennsieve;
pub mod pipeline;
mod user_agent;

// Re-export commonly used types
pub use config::{Config, ConfigError, Environment};
pub use dataset::{DATASET_NODE_ID_PREFIX, DatasetIdError, extract_dataset_uuid};
pub use export::{ExternalFile, UrlPattern, build_export_files, read_config, write_config};
pub use fetch::{DownloadError, FetchError, HttpFilesFetcher};
pub use metadata::{MetadataError, ModelServiceExporter};
pub use pennsieve::{ApiError, Integration, Session};
pub use pipeline::{
    ExternalFilesFetcher, MetadataExporter, PipelineError, RunReport, TtlSyncPipeline,
};
