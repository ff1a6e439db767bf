//! Durable cache of library locations.
//!
//! A single SQLite table of `(name, latitude, longitude)` rows plus a
//! one-row freshness stamp.

mod error;
mod sqlite;

pub use error::StoreError;
pub use sqlite::{LibraryStore, StoreConfig};
