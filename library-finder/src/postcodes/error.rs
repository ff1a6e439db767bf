//! Geocoding error types.

/// Errors that can occur when resolving a postcode.
#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service refused the postcode (unknown or terminated)
    #[error("postcode lookup rejected with status {status}")]
    Rejected { status: u16 },

    /// Failed to parse the response JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// The postcode exists but has no recorded location
    #[error("postcode {postcode} has no known location")]
    NoLocation { postcode: String },

    /// The service returned an out-of-range coordinate
    #[error("geocoder returned an invalid coordinate: {0}")]
    InvalidCoordinate(#[from] crate::domain::InvalidCoordinate),
}
