//! Nearest-library ranking.
//!
//! The dataset is a few thousand records at most, so ranking is a straight
//! scan and sort with no spatial index.

use crate::domain::{Coordinate, Library, RankedLibrary};
use crate::geo::distance_km;

/// The `n` libraries closest to `target`, nearest first.
///
/// - `n == 0` gives an empty result.
/// - If there are no more than `n` libraries, all of them are returned in
///   their original order and no distances are computed.
/// - Otherwise libraries are stably sorted by distance, so ties keep their
///   input order.
pub fn nearest_n(libraries: &[Library], target: Coordinate, n: usize) -> Vec<Library> {
    if n == 0 {
        return Vec::new();
    }

    if libraries.len() <= n {
        return libraries.to_vec();
    }

    rank_by_distance(libraries, target)
        .into_iter()
        .take(n)
        .map(|ranked| ranked.library.clone())
        .collect()
}

/// Every library with its distance from `target`, nearest first.
///
/// The sort is stable: libraries at equal distance keep their input order.
pub fn rank_by_distance(libraries: &[Library], target: Coordinate) -> Vec<RankedLibrary<'_>> {
    let mut ranked: Vec<RankedLibrary<'_>> = libraries
        .iter()
        .map(|library| RankedLibrary {
            library,
            distance_km: distance_km(library.location, target),
        })
        .collect();

    ranked.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    ranked
}
