//! Nearest public library finder.
//!
//! Answers: "which public libraries are closest to this UK postcode (or
//! this point on the map)?"
//!
//! Library locations come from Wikidata and are cached in SQLite, refreshed
//! when older than a configurable maximum age. Postcodes are checked and
//! located with postcodes.io.

pub mod cli;
pub mod config;
pub mod domain;
pub mod finder;
pub mod freshness;
pub mod geo;
pub mod logging;
pub mod postcodes;
pub mod refresh;
pub mod resolver;
pub mod store;
pub mod web;
pub mod wikidata;
