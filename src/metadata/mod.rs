//! Dataset metadata export.
//!
//! Pulls the dataset's model schema and the records of every model from the
//! model service and lays them out under `{input}/metadata`:
//!
//! ```text
//! metadata/
//!   schema/models.json
//!   records/{model}.json
//! ```

mod error;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument};
use url::Url;

pub use error::MetadataError;

use crate::pennsieve::{ApiError, Session};
use crate::pipeline::MetadataExporter;

/// Directory under the input directory that receives exported metadata.
pub const METADATA_DIR_NAME: &str = "metadata";

#[derive(Debug, Deserialize)]
struct ModelSummary {
    id: String,
    name: String,
}

/// [`MetadataExporter`] backed by the platform model service.
#[derive(Debug, Clone)]
pub struct ModelServiceExporter {
    session: Session,
    metadata_dir: PathBuf,
}

impl ModelServiceExporter {
    /// Creates an exporter writing under `{input_dir}/metadata`.
    #[must_use]
    pub fn new(session: Session, input_dir: &Path) -> Self {
        Self {
            session,
            metadata_dir: input_dir.join(METADATA_DIR_NAME),
        }
    }

    /// Root directory of the export.
    #[must_use]
    pub fn metadata_dir(&self) -> &Path {
        &self.metadata_dir
    }

    async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        let response = self.session.invoke(Method::GET, url, None).await?;
        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::transport(Method::GET.as_str(), url, e))?;
        serde_json::from_slice(&body).map_err(|e| ApiError::decode(Method::GET.as_str(), url, &body, e))
    }
}

#[async_trait]
impl MetadataExporter for ModelServiceExporter {
    #[instrument(skip(self), fields(dataset_id = %dataset_id))]
    async fn export(&self, dataset_id: &str) -> Result<(), MetadataError> {
        let concepts_url = endpoint(
            self.session.api_host(),
            &["models", "datasets", dataset_id, "concepts"],
        )?;

        let schema: serde_json::Value = self.get(concepts_url.as_str()).await?;
        let models: Vec<ModelSummary> = serde_json::from_value(schema.clone()).map_err(|e| {
            ApiError::decode(
                Method::GET.as_str(),
                concepts_url.as_str(),
                schema.to_string().as_bytes(),
                e,
            )
        })?;

        let schema_dir = self.metadata_dir.join("schema");
        let records_dir = self.metadata_dir.join("records");
        create_dir(&schema_dir).await?;
        create_dir(&records_dir).await?;
        write_json(&schema_dir.join("models.json"), &schema).await?;

        let mut used_stems = HashSet::new();
        for model in &models {
            let instances_url = endpoint(
                self.session.api_host(),
                &["models", "datasets", dataset_id, "concepts", model.id.as_str(), "instances"],
            )?;
            let records: serde_json::Value = self.get(instances_url.as_str()).await?;
            let stem = unique_stem(&mut used_stems, model)?;
            let path = records_dir.join(format!("{stem}.json"));
            write_json(&path, &records).await?;
            debug!(model = %model.name, path = %path.display(), "exported model records");
        }

        info!(models = models.len(), dir = %self.metadata_dir.display(), "exported dataset metadata");
        Ok(())
    }
}

/// Appends percent-encoded path segments to `host`.
fn endpoint(host: &str, segments: &[&str]) -> Result<Url, MetadataError> {
    let mut url = Url::parse(host).map_err(|_| MetadataError::invalid_url(host))?;
    url.path_segments_mut()
        .map_err(|()| MetadataError::invalid_url(host))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Picks the records file stem for `model`. Names that sanitize to a stem
/// already in use get the model ID appended.
fn unique_stem(used: &mut HashSet<String>, model: &ModelSummary) -> Result<String, MetadataError> {
    let base = file_stem(&model.name);
    if used.insert(base.clone()) {
        return Ok(base);
    }
    let qualified = format!("{base}-{}", file_stem(&model.id));
    if used.insert(qualified.clone()) {
        return Ok(qualified);
    }
    Err(MetadataError::DuplicateModel {
        name: model.name.clone(),
        id: model.id.clone(),
    })
}

async fn create_dir(path: &Path) -> Result<(), MetadataError> {
    tokio::fs::create_dir_all(path)
        .await
        .map_err(|e| MetadataError::io(path, e))
}

async fn write_json(path: &Path, value: &serde_json::Value) -> Result<(), MetadataError> {
    let encoded = serde_json::to_vec_pretty(value).map_err(|source| MetadataError::Encode {
        path: path.to_path_buf(),
        source,
    })?;
    tokio::fs::write(path, encoded)
        .await
        .map_err(|e| MetadataError::io(path, e))
}

/// Maps a model name to a safe file stem.
fn file_stem(model_name: &str) -> String {
    let stem: String = model_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    match stem.trim_matches('.') {
        "" => "_".to_string(),
        trimmed => trimmed.to_string(),
    }
}
