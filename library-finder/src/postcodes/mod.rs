//! Postcode geocoding.
//!
//! Resolves UK postcodes to coordinates through postcodes.io, with an
//! in-memory cache in front of it.

mod cache;
mod client;
mod error;

use async_trait::async_trait;

use crate::domain::{Coordinate, Postcode};

pub use cache::{CachedGeocoder, GeocodeCacheConfig};
pub use client::{PostcodesClient, PostcodesConfig};
pub use error::GeocodeError;

/// Something that can check and locate postcodes.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Whether the postcode exists.
    ///
    /// A refusal from the service means "no", not an error.
    async fn is_valid(&self, postcode: &Postcode) -> Result<bool, GeocodeError>;

    /// Where the postcode is.
    async fn locate(&self, postcode: &Postcode) -> Result<Coordinate, GeocodeError>;
}
