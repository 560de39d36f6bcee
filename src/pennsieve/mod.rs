//! Platform API client.
//!
//! - [`Session`] - bearer-authenticated request helper with status classification
//! - [`Integration`] - integration record returned by `GET /integrations/{id}`
//! - [`ApiError`] - transport, status and decoding failures

mod error;
mod integrations;
mod session;

pub use error::{ApiError, MAX_DISPLAY_BODY_BYTES, StatusKind};
pub use integrations::Integration;
pub use session::Session;
