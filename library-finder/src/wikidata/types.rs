//! SPARQL JSON result types.
//!
//! Only the variables selected by the library query are modelled. Optional
//! variables are simply absent from a binding when unbound.

use serde::Deserialize;

/// Top-level `application/sparql-results+json` document.
#[derive(Debug, Deserialize)]
pub struct SparqlResponse {
    pub results: SparqlResults,
}

#[derive(Debug, Deserialize)]
pub struct SparqlResults {
    pub bindings: Vec<LibraryBinding>,
}

/// One solution row of the library query.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryBinding {
    pub item_label: BindingValue,
    pub coord: Option<BindingValue>,
    pub start_time: Option<BindingValue>,
    pub end_time: Option<BindingValue>,
}

/// A bound RDF term. Only the lexical value is used.
#[derive(Debug, Deserialize)]
pub struct BindingValue {
    pub value: String,
}
