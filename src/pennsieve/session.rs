//! Authenticated platform API session.

use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, Method, Response};
use tracing::{debug, instrument, warn};

use super::error::ApiError;
use crate::http;

/// Bearer-authenticated handle on the platform API.
///
/// `api_host` serves the model service (metadata export); `api2_host` serves
/// integrations.
#[derive(Clone)]
pub struct Session {
    client: Client,
    token: String,
    api_host: String,
    api2_host: String,
}

impl Session {
    /// Creates a session using the shared HTTP client policy.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::ClientBuild`] if the HTTP client cannot be built.
    pub fn new(
        token: impl Into<String>,
        api_host: impl Into<String>,
        api2_host: impl Into<String>,
    ) -> Result<Self, ApiError> {
        let client = http::build_client().map_err(ApiError::ClientBuild)?;
        Ok(Self::with_client(client, token, api_host, api2_host))
    }

    /// Creates a session around an existing client.
    #[must_use]
    pub fn with_client(
        client: Client,
        token: impl Into<String>,
        api_host: impl Into<String>,
        api2_host: impl Into<String>,
    ) -> Self {
        Self {
            client,
            token: token.into(),
            api_host: trim_host(api_host.into()),
            api2_host: trim_host(api2_host.into()),
        }
    }

    /// Primary API host.
    #[must_use]
    pub fn api_host(&self) -> &str {
        &self.api_host
    }

    /// Secondary API host.
    #[must_use]
    pub fn api2_host(&self) -> &str {
        &self.api2_host
    }

    /// Sends an authenticated request and classifies the response status.
    ///
    /// Statuses in [400, 600) are turned into [`ApiError::Status`] after the
    /// body has been read for diagnostics; the response is dropped on that
    /// path. On success the open response is handed back to the caller.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] when the request cannot be sent and
    /// [`ApiError::Status`] for error statuses.
    #[instrument(level = "debug", skip(self, body), fields(method = %method, url = %url))]
    pub async fn invoke(
        &self,
        method: Method,
        url: &str,
        body: Option<Vec<u8>>,
    ) -> Result<Response, ApiError> {
        let mut request = self
            .client
            .request(method.clone(), url)
            .header(ACCEPT, "application/json")
            .header(AUTHORIZATION, format!("Bearer {}", self.token));
        if let Some(body) = body {
            request = request.body(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::transport(method.as_str(), url, e))?;

        let status = response.status();
        if (400..600).contains(&status.as_u16()) {
            let body = match response.bytes().await {
                Ok(bytes) => bytes.to_vec(),
                Err(e) => {
                    warn!(error = %e, "unable to read error response body");
                    format!("<unable to read body: {e}>").into_bytes()
                }
            };
            debug!(status = status.as_u16(), "platform API returned error status");
            return Err(ApiError::status(
                status.as_u16(),
                status.canonical_reason(),
                method.as_str(),
                url,
                &body,
            ));
        }

        Ok(response)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("api_host", &self.api_host)
            .field("api2_host", &self.api2_host)
            .finish_non_exhaustive()
    }
}

fn trim_host(host: String) -> String {
    match host.strip_suffix('/') {
        Some(trimmed) => trimmed.to_string(),
        None => host,
    }
}
