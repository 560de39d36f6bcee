//! Integration lookup against the secondary API host.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::error::ApiError;
use super::session::Session;

/// Platform record linking an external trigger to a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Integration {
    /// Integration identifier.
    pub uuid: String,
    /// Application that owns the integration.
    pub application_id: i64,
    /// Dataset node ID, e.g. `N:dataset:<uuid>`.
    pub dataset_node_id: String,
}

impl Session {
    /// Fetches the integration with the given ID.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the request fails, the API answers with an
    /// error status, or the body is not an [`Integration`].
    #[instrument(skip(self), fields(integration_id = %integration_id))]
    pub async fn get_integration(&self, integration_id: &str) -> Result<Integration, ApiError> {
        let url = format!("{}/integrations/{integration_id}", self.api2_host());

        let response = self.invoke(Method::GET, &url, None).await?;
        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::transport(Method::GET.as_str(), &url, e))?;

        let integration: Integration = serde_json::from_slice(&body)
            .map_err(|e| ApiError::decode(Method::GET.as_str(), &url, &body, e))?;
        debug!(dataset_id = %integration.dataset_node_id, "resolved integration");
        Ok(integration)
    }
}
