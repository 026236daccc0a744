//! Typed errors for the resolver library.
//!
//! Extraction itself has no error type: a page that yields nothing is a
//! normal outcome. Errors only exist where a collaborator can fail.

use thiserror::Error;

/// Errors raised by an [`ItemStore`](crate::store::ItemStore) backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The item to update does not exist (deleted between read and write)
    #[error("item not found: {id}")]
    MissingItem { id: i64 },

    /// Backend failure (connection, query, lock)
    #[error("storage error: {0}")]
    Backend(String),
}

#[cfg(feature = "sqlite")]
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

/// Errors surfaced by [`ImageResolver::resolve`](crate::resolver::ImageResolver::resolve).
///
/// Fetch and extraction failures never show up here; they collapse into
/// "no image found".
#[derive(Debug, Error)]
pub enum ResolveError {
    /// No item with this id in the store
    #[error("item not found: {id}")]
    ItemNotFound { id: i64 },

    /// Reading the item failed
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Reasons a page fetch produced no content.
///
/// Only visible through [`HttpFetcher::try_fetch`](crate::fetcher::HttpFetcher::try_fetch);
/// the [`PageFetcher`](crate::fetcher::PageFetcher) contract reports all of
/// them as `None`.
#[derive(Debug, Error)]
pub enum FetchError {
    /// URL could not be parsed or is not http(s)
    #[error("invalid URL: {url}")]
    InvalidUrl { url: String },

    /// Server answered with a non-2xx status
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    /// Request exceeded the configured timeout
    #[error("timeout fetching: {url}")]
    Timeout { url: String },

    /// Connection, TLS, redirect or body decoding failure
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Configured header value is not a valid HTTP header
    #[error("invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}
