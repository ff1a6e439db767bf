//! End-to-end resolution: location in, nearest libraries out.
//!
//! [`LibraryFinder`] owns the cache and holds the source and geocoder. It is
//! built once at startup and shared by every request handler.
//!
//! Each resolution:
//! 1. checks the cache's freshness stamp
//! 2. refreshes it if stale (at most one refresh runs at a time)
//! 3. loads the cached records and ranks them by distance
//!
//! If a refresh fails, the stale cache is served and a warning is logged.
//! Only when there is nothing cached at all does the failure reach the
//! caller, as [`FindError::NoData`].

mod error;

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tokio::sync::Mutex;

use crate::config::FinderConfig;
use crate::domain::{Coordinate, Library, Postcode};
use crate::freshness::{NEVER_REFRESHED, is_stale};
use crate::postcodes::Geocoder;
use crate::refresh::{RefreshError, RefreshReport, refresh};
use crate::resolver::nearest_n;
use crate::store::{LibraryStore, StoreError};
use crate::wikidata::LibrarySource;

pub use error::FindError;

/// Outcome of a freshness check.
#[derive(Debug)]
pub enum Freshness {
    /// The cache was within its maximum age.
    Fresh,
    /// The cache was stale and has been refreshed.
    Refreshed(RefreshReport),
    /// The cache was stale and the refresh failed; old data is still in place.
    Degraded(RefreshError),
}

/// Snapshot of the cache for status reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStatus {
    pub library_count: usize,
    /// `None` if the cache has never been filled.
    pub last_refreshed_on: Option<NaiveDate>,
    pub stale: bool,
}

/// Nearest libraries to a postcode, with where the postcode is.
#[derive(Debug, Clone)]
pub struct PostcodeMatch {
    pub postcode: Postcode,
    pub location: Coordinate,
    pub libraries: Vec<Library>,
}

/// The library-finding service.
pub struct LibraryFinder {
    store: LibraryStore,
    source: Arc<dyn LibrarySource>,
    geocoder: Arc<dyn Geocoder>,
    config: FinderConfig,
    /// Held for the duration of a refresh.
    refresh_lock: Mutex<()>,
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

impl LibraryFinder {
    pub fn new(
        store: LibraryStore,
        source: Arc<dyn LibrarySource>,
        geocoder: Arc<dyn Geocoder>,
        config: FinderConfig,
    ) -> Self {
        Self {
            store,
            source,
            geocoder,
            config,
            refresh_lock: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    /// Date of the last refresh.
    ///
    /// An unreadable stamp counts as never refreshed, so the next check
    /// refreshes and overwrites it.
    fn last_refreshed_on(&self) -> Result<NaiveDate, StoreError> {
        match self.store.last_refreshed_on() {
            Err(StoreError::InvalidDate { value }) => {
                tracing::warn!(%value, "unreadable refresh date in cache, treating as stale");
                Ok(NEVER_REFRESHED)
            }
            other => other,
        }
    }

    /// Whether the cache is due a refresh as of `today`.
    pub fn is_stale_on(&self, today: NaiveDate) -> Result<bool, StoreError> {
        let last = self.last_refreshed_on()?;
        Ok(is_stale(last, self.config.max_age_days, today))
    }

    /// Refresh the cache if it is stale.
    pub async fn refresh_if_stale(&self) -> Result<Freshness, StoreError> {
        self.refresh_if_stale_on(today()).await
    }

    /// Refresh the cache if it is stale as of `today`.
    ///
    /// A failed refresh is reported as [`Freshness::Degraded`], not as an
    /// error; only failing to read the freshness stamp is an error.
    pub async fn refresh_if_stale_on(&self, today: NaiveDate) -> Result<Freshness, StoreError> {
        if !self.is_stale_on(today)? {
            return Ok(Freshness::Fresh);
        }

        let _guard = self.refresh_lock.lock().await;

        // Someone else may have refreshed while we waited for the lock
        if !self.is_stale_on(today)? {
            return Ok(Freshness::Fresh);
        }

        tracing::info!(%today, "library cache is stale, refreshing");
        match refresh(&self.store, self.source.as_ref(), &self.config.filter, today).await {
            Ok(report) => Ok(Freshness::Refreshed(report)),
            Err(err) => {
                tracing::warn!(error = %err, "library refresh failed, keeping cached data");
                Ok(Freshness::Degraded(err))
            }
        }
    }

    /// Refresh the cache regardless of its age.
    pub async fn force_refresh(&self) -> Result<RefreshReport, RefreshError> {
        self.force_refresh_on(today()).await
    }

    pub async fn force_refresh_on(&self, today: NaiveDate) -> Result<RefreshReport, RefreshError> {
        let _guard = self.refresh_lock.lock().await;
        refresh(&self.store, self.source.as_ref(), &self.config.filter, today).await
    }

    /// The `n` cached libraries nearest to `location`, refreshing first if
    /// the cache is stale.
    pub async fn resolve_nearest(
        &self,
        location: Coordinate,
        n: usize,
    ) -> Result<Vec<Library>, FindError> {
        self.resolve_nearest_on(location, n, today()).await
    }

    pub async fn resolve_nearest_on(
        &self,
        location: Coordinate,
        n: usize,
        today: NaiveDate,
    ) -> Result<Vec<Library>, FindError> {
        if let Freshness::Degraded(err) = self.refresh_if_stale_on(today).await?
            && self.store.is_empty()?
        {
            return Err(FindError::NoData(err));
        }

        let libraries = self.store.load_all()?;
        let nearest = nearest_n(&libraries, location, n);

        tracing::debug!(
            %location,
            requested = n,
            returned = nearest.len(),
            cached = libraries.len(),
            "resolved nearest libraries"
        );
        Ok(nearest)
    }

    /// Check a postcode with the geocoder and find where it is.
    pub async fn locate_postcode(&self, postcode: &Postcode) -> Result<Coordinate, FindError> {
        if !self.geocoder.is_valid(postcode).await? {
            return Err(FindError::InvalidInput(format!("Invalid postcode: {postcode}")));
        }

        Ok(self.geocoder.locate(postcode).await?)
    }

    /// The `n` libraries nearest to a postcode given as free text.
    ///
    /// Text that is not shaped like a postcode is rejected without asking
    /// the geocoder.
    pub async fn resolve_postcode(&self, raw: &str, n: usize) -> Result<PostcodeMatch, FindError> {
        self.resolve_postcode_on(raw, n, today()).await
    }

    pub async fn resolve_postcode_on(
        &self,
        raw: &str,
        n: usize,
        today: NaiveDate,
    ) -> Result<PostcodeMatch, FindError> {
        let postcode =
            Postcode::parse(raw).map_err(|e| FindError::InvalidInput(e.to_string()))?;
        let location = self.locate_postcode(&postcode).await?;
        let libraries = self.resolve_nearest_on(location, n, today).await?;

        Ok(PostcodeMatch {
            postcode,
            location,
            libraries,
        })
    }

    /// Current size and age of the cache.
    pub fn status(&self) -> Result<CacheStatus, StoreError> {
        self.status_on(today())
    }

    pub fn status_on(&self, today: NaiveDate) -> Result<CacheStatus, StoreError> {
        let last = self.last_refreshed_on()?;
        Ok(CacheStatus {
            library_count: self.store.count()?,
            last_refreshed_on: (last != NEVER_REFRESHED).then_some(last),
            stale: is_stale(last, self.config.max_age_days, today),
        })
    }
}

#[cfg(test)]
mod tests;
