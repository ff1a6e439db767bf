//! Library records.

use super::Coordinate;

/// A public library and where it is.
///
/// Records carry no identity beyond their position in the cache; two
/// libraries may share a name.
#[derive(Debug, Clone, PartialEq)]
pub struct Library {
    pub name: String,
    pub location: Coordinate,
}

impl Library {
    pub fn new(name: impl Into<String>, location: Coordinate) -> Self {
        Self {
            name: name.into(),
            location,
        }
    }
}

/// A library paired with its distance from a search target.
///
/// Only exists while ranking; never stored.
#[derive(Debug, Clone, Copy)]
pub struct RankedLibrary<'a> {
    pub library: &'a Library,
    pub distance_km: f64,
}
