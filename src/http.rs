//! Shared HTTP client construction policy.
//!
//! Both the platform API session and the export file fetcher build their
//! `reqwest::Client` here so timeouts, user-agent and compression stay
//! consistent.

use std::time::Duration;

use reqwest::Client;

use crate::user_agent;

/// Default HTTP connect timeout (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default idle timeout between reads on a connection (5 minutes).
///
/// There is no whole-request deadline: a large export file keeps streaming as
/// long as bytes keep arriving.
pub const READ_IDLE_TIMEOUT_SECS: u64 = 300;

/// Builds an HTTP client with the default timeouts.
///
/// # Errors
///
/// Returns the underlying `reqwest::Error` when the builder rejects the
/// configuration (for example, when no TLS backend can be initialized).
pub fn build_client() -> Result<Client, reqwest::Error> {
    build_client_with_timeouts(CONNECT_TIMEOUT_SECS, READ_IDLE_TIMEOUT_SECS)
}

/// Builds an HTTP client with explicit connect and read-idle timeouts.
///
/// # Errors
///
/// Returns the underlying `reqwest::Error` when the builder fails.
pub fn build_client_with_timeouts(
    connect_timeout_secs: u64,
    read_idle_timeout_secs: u64,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .connect_timeout(Duration::from_secs(connect_timeout_secs))
        .read_timeout(Duration::from_secs(read_idle_timeout_secs))
        .gzip(true)
        .user_agent(user_agent::default_user_agent())
        .build()
}
