//! Domain types for the library finder.
//!
//! Types that come from external input enforce their invariants at
//! construction time, so code that receives them can trust their validity.

mod coordinate;
mod library;
mod postcode;

pub use coordinate::{Coordinate, InvalidCoordinate};
pub use library::{Library, RankedLibrary};
pub use postcode::{InvalidPostcode, Postcode};
