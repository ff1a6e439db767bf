//! Geographic coordinate type.

use std::fmt;

/// Error returned when a latitude/longitude pair is out of range.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid coordinate ({latitude}, {longitude}): {reason}")]
pub struct InvalidCoordinate {
    latitude: f64,
    longitude: f64,
    reason: &'static str,
}

/// A point on the Earth's surface, in decimal degrees.
///
/// Coordinates built with [`Coordinate::new`] are guaranteed to be finite and
/// in range. Values that come from inside the system (the
/// [`Coordinate::UNKNOWN`] sentinel, rows read back from the store) are built
/// with [`Coordinate::from_raw`] and are not checked.
///
/// # Examples
///
/// ```
/// use library_finder::domain::Coordinate;
///
/// let westminster = Coordinate::new(51.501, -0.141).unwrap();
/// assert_eq!(westminster.latitude(), 51.501);
///
/// // Latitude must be within [-90, 90]
/// assert!(Coordinate::new(91.0, 0.0).is_err());
///
/// // Longitude must be within [-180, 180]
/// assert!(Coordinate::new(0.0, -180.5).is_err());
/// ```
#[derive(Clone, Copy, PartialEq)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    /// Marker for a record whose location is not known.
    pub const UNKNOWN: Coordinate = Coordinate {
        latitude: -999.0,
        longitude: -999.0,
    };

    /// Build a validated coordinate from external input.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, InvalidCoordinate> {
        let invalid = |reason| InvalidCoordinate {
            latitude,
            longitude,
            reason,
        };

        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(invalid("must be finite numbers"));
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(invalid("latitude must be within [-90, 90]"));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(invalid("longitude must be within [-180, 180]"));
        }

        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Build a coordinate without range checks.
    pub const fn from_raw(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Whether this is the "no known location" sentinel.
    pub fn is_unknown(&self) -> bool {
        *self == Self::UNKNOWN
    }
}

impl fmt::Debug for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coordinate({}, {})", self.latitude, self.longitude)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_in_range_values() {
        assert!(Coordinate::new(0.0, 0.0).is_ok());
        assert!(Coordinate::new(90.0, 180.0).is_ok());
        assert!(Coordinate::new(-90.0, -180.0).is_ok());
        assert!(Coordinate::new(51.5, -0.1).is_ok());
    }

    #[test]
    fn rejects_out_of_range_latitude() {
        assert!(Coordinate::new(90.0001, 0.0).is_err());
        assert!(Coordinate::new(-91.0, 0.0).is_err());
    }

    #[test]
    fn rejects_out_of_range_longitude() {
        assert!(Coordinate::new(0.0, 180.0001).is_err());
        assert!(Coordinate::new(0.0, -200.0).is_err());
    }

    #[test]
    fn rejects_non_finite() {
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
        assert!(Coordinate::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn sentinel_is_unknown() {
        assert!(Coordinate::UNKNOWN.is_unknown());
        assert!(Coordinate::from_raw(-999.0, -999.0).is_unknown());
        assert!(!Coordinate::new(51.5, -0.1).unwrap().is_unknown());
    }

    #[test]
    fn sentinel_fails_validation() {
        let err = Coordinate::new(-999.0, -999.0).unwrap_err();
        assert!(err.to_string().contains("latitude must be within"));
    }

    #[test]
    fn debug_and_display() {
        let c = Coordinate::new(51.5, -0.1).unwrap();
        assert_eq!(format!("{:?}", c), "Coordinate(51.5, -0.1)");
        assert_eq!(format!("{}", c), "51.500000, -0.100000");
    }
}
