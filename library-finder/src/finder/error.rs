//! Resolution pipeline error types.

use crate::postcodes::GeocodeError;
use crate::refresh::RefreshError;
use crate::store::StoreError;

/// Errors from resolving a location to its nearest libraries.
///
/// An empty result is not an error: it comes back as `Ok` with no
/// libraries, and callers report "no libraries found".
#[derive(Debug, thiserror::Error)]
pub enum FindError {
    /// Malformed or unknown postcode, coordinate or count
    #[error("{0}")]
    InvalidInput(String),

    /// The geocoding service failed
    #[error("postcode lookup failed: {0}")]
    Geocode(#[source] GeocodeError),

    /// The cache is empty and could not be filled
    #[error("no library data available: {0}")]
    NoData(#[source] RefreshError),

    /// Reading the cache failed
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<GeocodeError> for FindError {
    fn from(err: GeocodeError) -> Self {
        match err {
            GeocodeError::Rejected { .. } | GeocodeError::NoLocation { .. } => {
                FindError::InvalidInput(err.to_string())
            }
            _ => FindError::Geocode(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_lookup_is_invalid_input() {
        let err = FindError::from(GeocodeError::Rejected { status: 404 });
        assert!(matches!(err, FindError::InvalidInput(_)));

        let err = FindError::from(GeocodeError::NoLocation {
            postcode: "GY1 1AA".into(),
        });
        assert!(matches!(err, FindError::InvalidInput(_)));
    }

    #[test]
    fn broken_response_is_geocode_failure() {
        let err = FindError::from(GeocodeError::Json {
            message: "eof".into(),
        });
        assert!(matches!(err, FindError::Geocode(_)));
        assert_eq!(err.to_string(), "postcode lookup failed: JSON parse error: eof");
    }
}
