//! Catalog error types.

use thiserror::Error;

/// Errors that can occur while reading a quiz catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No index entry has the requested id.
    #[error("quiz not found: {0}")]
    QuizNotFound(String),

    /// The server answered with an error status.
    #[error("HTTP {status} fetching {url}")]
    Http { status: u16, url: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    Network(String),

    /// A catalog document could not be parsed.
    #[error("malformed catalog data: {0}")]
    Malformed(String),
}

impl CatalogError {
    /// Returns `true` if the requested quiz does not exist, as opposed to the
    /// catalog being unreachable or broken.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::QuizNotFound(_))
            || matches!(self, CatalogError::Http { status: 404, .. })
    }
}
