//! The TTL sync pipeline step.
//!
//! One linear pass per process:
//!
//! ```text
//! Start -> IntegrationResolved -> DatasetIdExtracted -> (MetadataExported)
//!       -> ConfigWritten -> FilesDownloaded -> Done
//! ```
//!
//! The first error aborts the pass and is returned to the caller; nothing is
//! retried.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::config::{Config, ConfigError};
use crate::dataset::{DatasetIdError, extract_dataset_uuid};
use crate::export::{
    ConfigFileError, EXPORT_FILE_NAMES, UrlPattern, build_export_files, config_path, write_config,
};
use crate::fetch::{FetchError, HttpFilesFetcher};
use crate::metadata::{MetadataError, ModelServiceExporter};
use crate::pennsieve::{ApiError, Session};

/// Downloads the files listed in an external-files config.
#[async_trait]
pub trait ExternalFilesFetcher: Send + Sync {
    /// Reads `config_path` and downloads each entry into `dest_dir`,
    /// returning the written paths in config order.
    async fn fetch(&self, config_path: &Path, dest_dir: &Path) -> Result<Vec<PathBuf>, FetchError>;
}

/// Exports a dataset's metadata alongside the downloaded files.
#[async_trait]
pub trait MetadataExporter: Send + Sync {
    /// Exports metadata for the dataset with node ID `dataset_id`.
    async fn export(&self, dataset_id: &str) -> Result<(), MetadataError>;
}

/// Progress markers of a pipeline pass, used in log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Start,
    IntegrationResolved,
    DatasetIdExtracted,
    MetadataExported,
    ConfigWritten,
    FilesDownloaded,
    Done,
    Failed,
}

impl std::fmt::Display for PipelineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Start => "start",
            Self::IntegrationResolved => "integration-resolved",
            Self::DatasetIdExtracted => "dataset-id-extracted",
            Self::MetadataExported => "metadata-exported",
            Self::ConfigWritten => "config-written",
            Self::FilesDownloaded => "files-downloaded",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Any failure of a pipeline pass. Step errors already carry their own
/// context and are passed through unchanged.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    DatasetId(#[from] DatasetIdError),

    #[error(transparent)]
    ConfigFile(#[from] ConfigFileError),

    #[error(transparent)]
    Metadata(#[from] MetadataError),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Outcome of a successful pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Dataset node ID the integration resolved to.
    pub dataset_id: String,
    /// Where the external-files config was written.
    pub config_path: PathBuf,
    /// Downloaded files, in config order.
    pub downloaded: Vec<PathBuf>,
}

/// Resolves an integration's dataset and stages its export files.
pub struct TtlSyncPipeline {
    integration_id: String,
    input_dir: PathBuf,
    session: Session,
    url_pattern: UrlPattern,
    file_names: Vec<String>,
    fetcher: Box<dyn ExternalFilesFetcher>,
    metadata_exporter: Option<Box<dyn MetadataExporter>>,
}

impl TtlSyncPipeline {
    /// Creates a pipeline with the default export file names and no metadata export.
    pub fn new(
        integration_id: impl Into<String>,
        input_dir: impl Into<PathBuf>,
        session: Session,
        url_pattern: UrlPattern,
        fetcher: Box<dyn ExternalFilesFetcher>,
    ) -> Self {
        Self {
            integration_id: integration_id.into(),
            input_dir: input_dir.into(),
            session,
            url_pattern,
            file_names: EXPORT_FILE_NAMES.iter().map(ToString::to_string).collect(),
            fetcher,
            metadata_exporter: None,
        }
    }

    /// Wires the production collaborators described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] if the URL template is invalid or an HTTP
    /// client cannot be built. No network call is made.
    pub fn from_config(config: &Config) -> Result<Self, PipelineError> {
        let session = Session::new(
            config.session_token.as_str(),
            config.api_host.as_str(),
            config.api2_host.as_str(),
        )?;
        let fetcher = HttpFilesFetcher::new()?;
        let mut pipeline = Self::new(
            config.integration_id.as_str(),
            config.input_dir.clone(),
            session.clone(),
            config.url_pattern()?,
            Box::new(fetcher),
        );
        if config.metadata_export {
            pipeline = pipeline.with_metadata_exporter(Box::new(ModelServiceExporter::new(
                session,
                &config.input_dir,
            )));
        }
        Ok(pipeline)
    }

    /// Enables the metadata export sub-step.
    #[must_use]
    pub fn with_metadata_exporter(mut self, exporter: Box<dyn MetadataExporter>) -> Self {
        self.metadata_exporter = Some(exporter);
        self
    }

    /// Replaces the export file name list. Order is preserved in the config.
    #[must_use]
    pub fn with_file_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.file_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Where the external-files config will be written.
    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        config_path(&self.input_dir)
    }

    /// Runs the pass once.
    ///
    /// # Errors
    ///
    /// Returns the first step error; later steps are skipped.
    #[instrument(skip(self), fields(integration_id = %self.integration_id))]
    pub async fn run(&self) -> Result<RunReport, PipelineError> {
        info!(state = %PipelineState::Start, "processing integration");
        let outcome = self.run_steps().await;
        match &outcome {
            Ok(report) => info!(
                state = %PipelineState::Done,
                dataset_id = %report.dataset_id,
                files = report.downloaded.len(),
                "TTL sync complete"
            ),
            Err(error) => debug!(state = %PipelineState::Failed, error = %error, "TTL sync aborted"),
        }
        outcome
    }

    async fn run_steps(&self) -> Result<RunReport, PipelineError> {
        let integration = self.session.get_integration(&self.integration_id).await?;
        let dataset_id = integration.dataset_node_id;
        info!(state = %PipelineState::IntegrationResolved, dataset_id = %dataset_id, "running TTL sync");

        let dataset_uuid = extract_dataset_uuid(&dataset_id)?;
        info!(state = %PipelineState::DatasetIdExtracted, dataset_uuid, "extracted dataset UUID");

        if let Some(exporter) = &self.metadata_exporter {
            exporter.export(&dataset_id).await?;
            info!(state = %PipelineState::MetadataExported, "exported dataset metadata");
        }

        info!(dataset_id = %dataset_id, "constructing external file config for dataset");
        let files = build_export_files(dataset_uuid, &self.url_pattern, self.file_names.as_slice());
        let config_path = self.config_path();
        write_config(&config_path, &files).await?;
        info!(state = %PipelineState::ConfigWritten, path = %config_path.display(), "wrote external files config");

        info!("downloading TTL files");
        let downloaded = self.fetcher.fetch(&config_path, &self.input_dir).await?;
        info!(state = %PipelineState::FilesDownloaded, count = downloaded.len(), "downloaded TTL files");

        Ok(RunReport {
            dataset_id,
            config_path,
            downloaded,
        })
    }
}

impl std::fmt::Debug for TtlSyncPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtlSyncPipeline")
            .field("integration_id", &self.integration_id)
            .field("input_dir", &self.input_dir)
            .field("url_pattern", &self.url_pattern)
            .field("file_names", &self.file_names)
            .field("metadata_export", &self.metadata_exporter.is_some())
            .finish_non_exhaustive()
    }
}
