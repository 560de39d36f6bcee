//! External-files fetcher.
//!
//! Reads `external-files.json` and downloads every entry, in order, into a
//! destination directory under the entry's `name`.

mod error;
mod fetcher;

pub use error::{DownloadError, FetchError};
pub use fetcher::HttpFilesFetcher;
