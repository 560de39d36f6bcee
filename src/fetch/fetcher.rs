//! Streams each configured external file into a destination directory.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, instrument};
use url::Url;

use super::error::{DownloadError, FetchError};
use crate::export::{ExternalFile, FileAuth, read_config};
use crate::http;
use crate::pipeline::ExternalFilesFetcher;

/// HTTP implementation of [`ExternalFilesFetcher`].
///
/// Files are downloaded one at a time in config order; the first failure
/// stops the run.
#[derive(Debug, Clone)]
pub struct HttpFilesFetcher {
    client: Client,
}

impl HttpFilesFetcher {
    /// Creates a fetcher using the shared HTTP client policy.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::ClientBuild`] if the HTTP client cannot be built.
    pub fn new() -> Result<Self, FetchError> {
        let client = http::build_client().map_err(FetchError::ClientBuild)?;
        Ok(Self { client })
    }

    /// Creates a fetcher around an existing client.
    #[must_use]
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Downloads one entry to `dest_dir/{name}` and returns the written path.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError`] for invalid names or URLs, network failures,
    /// non-success statuses and disk errors. A partially written file is
    /// removed before the error is returned.
    #[instrument(skip(self, file), fields(name = %file.name, url = %file.url))]
    pub async fn download(
        &self,
        file: &ExternalFile,
        dest_dir: &Path,
    ) -> Result<PathBuf, DownloadError> {
        validate_name(&file.name)?;
        let url = request_url(file)?;

        let mut request = self.client.get(url.clone());
        match &file.auth {
            Some(FileAuth::Bearer { token }) => request = request.bearer_auth(token),
            Some(FileAuth::Basic { username, password }) => {
                request = request.basic_auth(username, password.as_deref());
            }
            None => {}
        }

        let response = request
            .send()
            .await
            .map_err(|e| DownloadError::network(url.as_str(), e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::http_status(url.as_str(), status.as_u16()));
        }

        let file_path = dest_dir.join(&file.name);
        let mut output = File::create(&file_path)
            .await
            .map_err(|e| DownloadError::io(file_path.clone(), e))?;

        let stream_result = stream_to_file(&mut output, response, url.as_str(), &file_path).await;
        drop(output);
        let bytes = match stream_result {
            Ok(bytes) => bytes,
            Err(error) => {
                debug!(path = %file_path.display(), "cleaning up partial file after error");
                let _ = tokio::fs::remove_file(&file_path).await;
                return Err(error);
            }
        };

        info!(path = %file_path.display(), bytes, "download complete");
        Ok(file_path)
    }
}

#[async_trait]
impl ExternalFilesFetcher for HttpFilesFetcher {
    async fn fetch(&self, config_path: &Path, dest_dir: &Path) -> Result<Vec<PathBuf>, FetchError> {
        let files = read_config(config_path).await?;
        let mut written = Vec::with_capacity(files.len());
        for file in &files {
            let path = self
                .download(file, dest_dir)
                .await
                .map_err(|source| FetchError::Download {
                    name: file.name.clone(),
                    source,
                })?;
            written.push(path);
        }
        Ok(written)
    }
}

fn validate_name(name: &str) -> Result<(), DownloadError> {
    let single_component = !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && !name.contains('\0');
    if single_component {
        Ok(())
    } else {
        Err(DownloadError::invalid_name(name))
    }
}

fn request_url(file: &ExternalFile) -> Result<Url, DownloadError> {
    let mut url = Url::parse(&file.url).map_err(|_| DownloadError::invalid_url(&file.url))?;
    if let Some(query) = &file.query
        && !query.is_empty()
    {
        url.query_pairs_mut().extend_pairs(query.iter());
    }
    Ok(url)
}

/// Streams response body to file, returning bytes written.
async fn stream_to_file(
    file: &mut File,
    response: reqwest::Response,
    url: &str,
    file_path: &Path,
) -> Result<u64, DownloadError> {
    let mut writer = BufWriter::new(file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| DownloadError::network(url, e))?;

        writer
            .write_all(&chunk)
            .await
            .map_err(|e| DownloadError::io(file_path.to_path_buf(), e))?;

        bytes_written += chunk.len() as u64;
    }

    writer
        .flush()
        .await
        .map_err(|e| DownloadError::io(file_path.to_path_buf(), e))?;

    Ok(bytes_written)
}
