//! Error types for platform API calls.

use thiserror::Error;

/// Response bodies longer than this are truncated in error messages.
pub const MAX_DISPLAY_BODY_BYTES: usize = 1000;

/// Whether a failing status came from the client (4xx) or server (5xx) range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    /// 400..500
    Client,
    /// 500..600
    Server,
}

impl std::fmt::Display for StatusKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Client => f.write_str("client"),
            Self::Server => f.write_str("server"),
        }
    }
}

/// Errors raised while talking to the platform API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    /// Request could not be built or sent, or the body could not be read.
    #[error("error invoking {method} {url}: {source}")]
    Transport {
        /// HTTP method of the failed request.
        method: String,
        /// Target URL.
        url: String,
        /// Underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The API answered with a status in [400, 600).
    #[error("{kind} error {status} calling {method} {url}; response body: {body}")]
    Status {
        /// Client or server error range.
        kind: StatusKind,
        /// Status line, e.g. `404 Not Found`.
        status: String,
        /// HTTP method of the failed request.
        method: String,
        /// Target URL.
        url: String,
        /// Response body prepared for display.
        body: String,
    },

    /// The response body was not the expected JSON shape.
    #[error("error decoding response [{body}] from {method} {url}: {source}")]
    Decode {
        /// HTTP method of the request.
        method: String,
        /// Target URL.
        url: String,
        /// Raw response body.
        body: String,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    /// Creates a transport error.
    pub fn transport(
        method: impl Into<String>,
        url: impl Into<String>,
        source: reqwest::Error,
    ) -> Self {
        Self::Transport {
            method: method.into(),
            url: url.into(),
            source,
        }
    }

    /// Creates a status error from the numeric code, its reason phrase and the raw body.
    pub fn status(
        code: u16,
        reason: Option<&str>,
        method: impl Into<String>,
        url: impl Into<String>,
        body: &[u8],
    ) -> Self {
        let kind = if code >= 500 {
            StatusKind::Server
        } else {
            StatusKind::Client
        };
        let status = match reason {
            Some(reason) => format!("{code} {reason}"),
            None => code.to_string(),
        };
        Self::Status {
            kind,
            status,
            method: method.into(),
            url: url.into(),
            body: display_body(body),
        }
    }

    /// Creates a decode error carrying the raw body.
    pub fn decode(
        method: impl Into<String>,
        url: impl Into<String>,
        body: &[u8],
        source: serde_json::Error,
    ) -> Self {
        Self::Decode {
            method: method.into(),
            url: url.into(),
            body: String::from_utf8_lossy(body).into_owned(),
            source,
        }
    }

    /// HTTP status code for [`ApiError::Status`] errors.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => status
                .split_whitespace()
                .next()
                .and_then(|code| code.parse().ok()),
            _ => None,
        }
    }
}

fn display_body(body: &[u8]) -> String {
    if body.len() > MAX_DISPLAY_BODY_BYTES {
        let head = String::from_utf8_lossy(&body[..MAX_DISPLAY_BODY_BYTES]);
        format!("<truncated for logging> {head}")
    } else {
        String::from_utf8_lossy(body).into_owned()
    }
}
