//! Great-circle distance.

use crate::domain::Coordinate;

/// Mean Earth radius used for all distance calculations.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Distance in kilometres between two points, by the spherical law of
/// cosines.
///
/// Inputs are not range-checked. The cosine is clamped to [-1, 1] so that
/// rounding on near-identical or near-antipodal points cannot push `acos`
/// out of its domain.
///
/// # Examples
///
/// ```
/// use library_finder::domain::Coordinate;
/// use library_finder::geo::distance_km;
///
/// let london = Coordinate::new(51.5074, -0.1278).unwrap();
/// let paris = Coordinate::new(48.8566, 2.3522).unwrap();
///
/// let d = distance_km(london, paris);
/// assert!((d - 343.5).abs() < 1.0);
/// assert_eq!(distance_km(london, london), 0.0);
/// ```
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    if a == b {
        return 0.0;
    }

    let lat_a = a.latitude().to_radians();
    let lat_b = b.latitude().to_radians();
    // abs() keeps the result bit-identical when the arguments are swapped
    let delta_lon = (b.longitude().to_radians() - a.longitude().to_radians()).abs();

    let cos_angle = lat_a.sin() * lat_b.sin() + lat_a.cos() * lat_b.cos() * delta_lon.cos();

    cos_angle.clamp(-1.0, 1.0).acos() * EARTH_RADIUS_KM
}
