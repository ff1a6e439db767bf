//! Data transfer objects for web responses.

use serde::Serialize;

use crate::domain::{Coordinate, Library};
use crate::finder::CacheStatus;

/// A library in a result list.
#[derive(Debug, Serialize)]
pub struct LibraryResult {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl LibraryResult {
    pub fn from_library(library: &Library) -> Self {
        Self {
            name: library.name.clone(),
            latitude: library.location.latitude(),
            longitude: library.location.longitude(),
        }
    }
}

/// Response listing the nearest libraries to a location.
#[derive(Debug, Serialize)]
pub struct NearestLibrariesResponse {
    pub success: bool,

    /// The postcode searched from, when the search was by postcode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postcode: Option<String>,

    /// Where the search was centred
    pub latitude: f64,
    pub longitude: f64,

    /// Number of libraries returned
    pub count: usize,

    /// Libraries, nearest first
    pub libraries: Vec<LibraryResult>,
}

impl NearestLibrariesResponse {
    pub fn new(postcode: Option<String>, location: Coordinate, libraries: &[Library]) -> Self {
        Self {
            success: true,
            postcode,
            latitude: location.latitude(),
            longitude: location.longitude(),
            count: libraries.len(),
            libraries: libraries.iter().map(LibraryResult::from_library).collect(),
        }
    }
}

/// Cache status response.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub library_count: usize,

    /// Date of the last refresh (YYYY-MM-DD), or null if never refreshed
    pub last_refreshed_on: Option<String>,

    pub stale: bool,
}

impl From<CacheStatus> for StatusResponse {
    fn from(status: CacheStatus) -> Self {
        Self {
            library_count: status.library_count,
            last_refreshed_on: status
                .last_refreshed_on
                .map(|d| d.format("%Y-%m-%d").to_string()),
            stale: status.stale,
        }
    }
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}
