//! Knowledge-base source error types.

/// Errors that can occur when fetching library records.
///
/// A source that answers successfully with zero usable records is not an
/// error.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint returned an error status
    #[error("SPARQL endpoint error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse the response JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// A coordinate literal was not of the form `Point(<lon> <lat>)`
    #[error("malformed coordinate literal: {value:?}")]
    Coordinate { value: String },

    /// Fixture file could not be read
    #[error("fixture error: {message}")]
    Fixture { message: String },
}
