//! Conversion from SPARQL bindings to candidate library records.

use crate::domain::Coordinate;

use super::SourceLibrary;
use super::error::SourceError;
use super::types::{LibraryBinding, SparqlResponse};

/// Convert every binding in a response, failing on the first bad one.
pub fn convert_response(response: SparqlResponse) -> Result<Vec<SourceLibrary>, SourceError> {
    response
        .results
        .bindings
        .into_iter()
        .map(convert_binding)
        .collect()
}

/// Convert one binding.
///
/// A binding without a coordinate gets [`Coordinate::UNKNOWN`]; one with a
/// start or end qualifier is marked as time-bounded. Filtering is left to
/// the refresh step.
pub fn convert_binding(binding: LibraryBinding) -> Result<SourceLibrary, SourceError> {
    let location = match &binding.coord {
        Some(coord) => parse_point(&coord.value)?,
        None => Coordinate::UNKNOWN,
    };

    Ok(SourceLibrary {
        name: binding.item_label.value,
        location,
        time_bounded: binding.start_time.is_some() || binding.end_time.is_some(),
    })
}

/// Parse a WKT point literal, `Point(<lon> <lat>)`.
///
/// WKT puts longitude first, so the two numbers are swapped on the way out.
pub fn parse_point(value: &str) -> Result<Coordinate, SourceError> {
    let malformed = || SourceError::Coordinate {
        value: value.to_string(),
    };

    let inner = value
        .split_once('(')
        .and_then(|(_, rest)| rest.split_once(')'))
        .map(|(inner, _)| inner)
        .ok_or_else(malformed)?;

    let mut numbers = inner.split_whitespace().map(str::parse::<f64>);
    let (Some(Ok(first)), Some(Ok(second)), None) = (numbers.next(), numbers.next(), numbers.next())
    else {
        return Err(malformed());
    };

    let (longitude, latitude) = (first, second);
    Ok(Coordinate::from_raw(latitude, longitude))
}
