//! Library locations from Wikidata.
//!
//! The refresh step only depends on the [`LibrarySource`] trait. Two
//! implementations are provided:
//! - [`WikidataClient`] queries the public SPARQL endpoint
//! - [`FixtureSource`] replays a saved response from disk
//!
//! Sources return every candidate they find, including ones that will be
//! discarded (no location, outside their operating dates). Filtering is done
//! by the refresh step so that it is the same for every source.

mod client;
mod convert;
mod error;
mod fixture;
mod types;

use async_trait::async_trait;

use crate::domain::Coordinate;

pub use client::{WikidataClient, WikidataConfig};
pub use convert::{convert_binding, convert_response, parse_point};
pub use error::SourceError;
pub use fixture::FixtureSource;
pub use types::{BindingValue, LibraryBinding, SparqlResponse, SparqlResults};

/// A library record as reported by the source, before filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceLibrary {
    pub name: String,
    /// [`Coordinate::UNKNOWN`] when the source has no location.
    pub location: Coordinate,
    /// The source tags the record with a start or end date.
    pub time_bounded: bool,
}

impl SourceLibrary {
    pub fn new(name: impl Into<String>, location: Coordinate) -> Self {
        Self {
            name: name.into(),
            location,
            time_bounded: false,
        }
    }

    /// Mark the record as having a start or end date.
    pub fn time_bounded(mut self) -> Self {
        self.time_bounded = true;
        self
    }
}

/// Something that can produce the full set of candidate library records.
#[async_trait]
pub trait LibrarySource: Send + Sync {
    async fn fetch_libraries(&self) -> Result<Vec<SourceLibrary>, SourceError>;
}
