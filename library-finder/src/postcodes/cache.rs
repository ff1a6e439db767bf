//! Caching layer for geocoding responses.
//!
//! Postcode locations almost never change, and the same handful of
//! postcodes tend to be asked about repeatedly, so answers are kept in
//! memory for a day. Only successful answers are cached; errors always go
//! back to the service next time.

use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache as MokaCache;

use crate::domain::{Coordinate, Postcode};

use super::Geocoder;
use super::error::GeocodeError;

/// Cache key: the compact (space-free) postcode.
type PostcodeKey = String;

/// Configuration for the geocoding cache.
#[derive(Debug, Clone)]
pub struct GeocodeCacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries per cache.
    pub max_capacity: u64,
}

impl Default for GeocodeCacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(24 * 60 * 60),
            max_capacity: 10_000,
        }
    }
}

/// Geocoder with caching.
///
/// Wraps any [`Geocoder`] and caches validity checks and locations
/// separately.
pub struct CachedGeocoder<G> {
    inner: G,
    validity: MokaCache<PostcodeKey, bool>,
    locations: MokaCache<PostcodeKey, Coordinate>,
}

impl<G: Geocoder> CachedGeocoder<G> {
    /// Create a new cached geocoder.
    pub fn new(inner: G, config: &GeocodeCacheConfig) -> Self {
        let validity = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();
        let locations = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self {
            inner,
            validity,
            locations,
        }
    }

    /// Access the underlying geocoder for operations that bypass cache.
    pub fn inner(&self) -> &G {
        &self.inner
    }

    /// Invalidate all cached entries.
    pub fn invalidate_all(&self) {
        self.validity.invalidate_all();
        self.locations.invalidate_all();
    }
}

#[async_trait]
impl<G: Geocoder> Geocoder for CachedGeocoder<G> {
    async fn is_valid(&self, postcode: &Postcode) -> Result<bool, GeocodeError> {
        let key = postcode.compact();

        if let Some(cached) = self.validity.get(&key).await {
            return Ok(cached);
        }

        let valid = self.inner.is_valid(postcode).await?;
        self.validity.insert(key, valid).await;
        Ok(valid)
    }

    async fn locate(&self, postcode: &Postcode) -> Result<Coordinate, GeocodeError> {
        let key = postcode.compact();

        if let Some(cached) = self.locations.get(&key).await {
            return Ok(cached);
        }

        let location = self.inner.locate(postcode).await?;
        self.locations.insert(key, location).await;
        Ok(location)
    }
}
