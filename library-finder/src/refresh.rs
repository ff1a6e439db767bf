//! Cache refresh: fetch, filter, replace.
//!
//! The fetch completes before anything is written. If it fails the cache
//! and its freshness stamp are left exactly as they were. If it succeeds the
//! surviving records replace the old ones in a single transaction.

use chrono::NaiveDate;

use crate::config::RecordFilter;
use crate::domain::{Coordinate, Library};
use crate::store::{LibraryStore, StoreError};
use crate::wikidata::{LibrarySource, SourceError, SourceLibrary};

/// Errors that abort a refresh.
#[derive(Debug, thiserror::Error)]
pub enum RefreshError {
    /// The source could not be reached or returned an unusable payload
    #[error("failed to fetch libraries: {0}")]
    Source(#[from] SourceError),

    /// Writing the new records failed and was rolled back
    #[error("failed to store libraries: {0}")]
    Store(#[from] StoreError),
}

/// What a successful refresh did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshReport {
    /// Candidates returned by the source.
    pub fetched: usize,
    /// Records written to the cache.
    pub stored: usize,
    /// Dropped for having a start or end date.
    pub time_bounded: usize,
    /// Dropped for having no location.
    pub missing_location: usize,
    /// Dropped for a non-finite or out-of-range location.
    pub invalid_location: usize,
    /// Dropped for a blocklisted latitude.
    pub blocklisted: usize,
    /// Dropped for having an empty name.
    pub unnamed: usize,
}

impl RefreshReport {
    /// Total number of candidates discarded.
    pub fn dropped(&self) -> usize {
        self.time_bounded
            + self.missing_location
            + self.invalid_location
            + self.blocklisted
            + self.unnamed
    }
}

/// Why a candidate was discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rejection {
    TimeBounded,
    MissingLocation,
    InvalidLocation,
    Blocklisted,
    Unnamed,
}

fn check(candidate: &SourceLibrary, filter: &RecordFilter) -> Result<(), Rejection> {
    if candidate.time_bounded {
        return Err(Rejection::TimeBounded);
    }
    if candidate.location.is_unknown() {
        return Err(Rejection::MissingLocation);
    }
    let location = candidate.location;
    if Coordinate::new(location.latitude(), location.longitude()).is_err() {
        return Err(Rejection::InvalidLocation);
    }
    if filter.is_blocklisted(candidate.location.latitude()) {
        return Err(Rejection::Blocklisted);
    }
    if candidate.name.trim().is_empty() {
        return Err(Rejection::Unnamed);
    }
    Ok(())
}

/// Keep the candidates that pass the filter, in source order.
pub fn filter_candidates(
    candidates: Vec<SourceLibrary>,
    filter: &RecordFilter,
) -> (Vec<Library>, RefreshReport) {
    let mut report = RefreshReport {
        fetched: candidates.len(),
        ..RefreshReport::default()
    };

    let mut kept = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        match check(&candidate, filter) {
            Ok(()) => kept.push(Library::new(candidate.name, candidate.location)),
            Err(reason) => {
                tracing::debug!(name = %candidate.name, ?reason, "dropping library candidate");
                match reason {
                    Rejection::TimeBounded => report.time_bounded += 1,
                    Rejection::MissingLocation => report.missing_location += 1,
                    Rejection::InvalidLocation => report.invalid_location += 1,
                    Rejection::Blocklisted => report.blocklisted += 1,
                    Rejection::Unnamed => report.unnamed += 1,
                }
            }
        }
    }

    report.stored = kept.len();
    (kept, report)
}

/// Fetch fresh records from `source` and replace the cache with them.
///
/// On error nothing has been written.
pub async fn refresh(
    store: &LibraryStore,
    source: &dyn LibrarySource,
    filter: &RecordFilter,
    today: NaiveDate,
) -> Result<RefreshReport, RefreshError> {
    let candidates = source.fetch_libraries().await?;
    let (libraries, report) = filter_candidates(candidates, filter);

    store.replace_all(&libraries, today)?;

    tracing::info!(
        fetched = report.fetched,
        stored = report.stored,
        dropped = report.dropped(),
        %today,
        "library cache refreshed"
    );
    Ok(report)
}
