//! Wikidata SPARQL client.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};

use super::convert::convert_response;
use super::error::SourceError;
use super::types::SparqlResponse;
use super::{LibrarySource, SourceLibrary};

/// Default SPARQL endpoint.
const DEFAULT_BASE_URL: &str = "https://query.wikidata.org/sparql";

/// Query selecting every UK public library with its qualifiers.
const LIBRARY_QUERY: &str = include_str!("../../queries/libraries.sparql");

/// Wikidata asks automated clients to identify themselves.
const DEFAULT_USER_AGENT: &str = concat!(
    "library-finder/",
    env!("CARGO_PKG_VERSION"),
    " (nearest public library lookup)"
);

/// Configuration for the SPARQL client.
#[derive(Debug, Clone)]
pub struct WikidataConfig {
    /// SPARQL endpoint URL
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl WikidataConfig {
    /// Create a config pointing at the public Wikidata endpoint.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }

    /// Set a custom endpoint URL (for testing or a mirror).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for WikidataConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Client for the Wikidata SPARQL endpoint.
#[derive(Debug, Clone)]
pub struct WikidataClient {
    http: reqwest::Client,
    base_url: String,
}

impl WikidataClient {
    /// Create a new SPARQL client.
    pub fn new(config: WikidataConfig) -> Result<Self, SourceError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/sparql-results+json"),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }

    /// Run the library query and return the raw response document.
    pub async fn query(&self) -> Result<SparqlResponse, SourceError> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[("query", LIBRARY_QUERY)])
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| SourceError::Json {
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl LibrarySource for WikidataClient {
    async fn fetch_libraries(&self) -> Result<Vec<SourceLibrary>, SourceError> {
        let response = self.query().await?;
        let libraries = convert_response(response)?;
        tracing::info!(count = libraries.len(), "fetched library candidates from Wikidata");
        Ok(libraries)
    }
}
