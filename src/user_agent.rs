//! User-Agent string sent with every platform API and export file request.

/// Project URL for User-Agent identification.
const PROJECT_UA_URL: &str = "https://github.com/pennsieve/processor-pre-ttl-sync";

/// Default User-Agent for all outbound requests.
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("ttl-sync/{version} (pipeline-preprocessor; +{PROJECT_UA_URL})")
}
