//! postcodes.io HTTP client.

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::{Coordinate, Postcode};

use super::Geocoder;
use super::error::GeocodeError;

/// Default base URL for postcodes.io.
const DEFAULT_BASE_URL: &str = "https://api.postcodes.io";

/// Response to `GET /postcodes/{postcode}/validate`.
#[derive(Debug, Deserialize)]
struct ValidateResponse {
    result: bool,
}

/// Response to `GET /postcodes/{postcode}`.
#[derive(Debug, Deserialize)]
struct LookupResponse {
    result: LookupResult,
}

/// Minimal DTO for a postcode lookup - we only need the location.
#[derive(Debug, Deserialize)]
struct LookupResult {
    latitude: Option<f64>,
    longitude: Option<f64>,
}

/// Configuration for the postcodes.io client.
#[derive(Debug, Clone)]
pub struct PostcodesConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl PostcodesConfig {
    /// Create a config pointing at the public postcodes.io API.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
        }
    }

    /// Set a custom base URL (for testing or a self-hosted instance).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

impl Default for PostcodesConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Client for the postcodes.io API.
#[derive(Debug, Clone)]
pub struct PostcodesClient {
    http: reqwest::Client,
    base_url: String,
}

impl PostcodesClient {
    /// Create a new postcodes.io client.
    pub fn new(config: PostcodesConfig) -> Result<Self, GeocodeError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn postcode_url(&self, postcode: &Postcode) -> String {
        format!("{}/postcodes/{}", self.base_url, postcode.compact())
    }
}

#[async_trait]
impl Geocoder for PostcodesClient {
    async fn is_valid(&self, postcode: &Postcode) -> Result<bool, GeocodeError> {
        let url = format!("{}/validate", self.postcode_url(postcode));

        let response = self.http.get(&url).send().await?;
        let status = response.status();

        // Any non-success answer counts as "not a valid postcode"
        if !status.is_success() {
            tracing::debug!(%postcode, status = status.as_u16(), "postcode validation refused");
            return Ok(false);
        }

        let body = response.text().await?;
        let parsed: ValidateResponse =
            serde_json::from_str(&body).map_err(|e| GeocodeError::Json {
                message: e.to_string(),
            })?;

        Ok(parsed.result)
    }

    async fn locate(&self, postcode: &Postcode) -> Result<Coordinate, GeocodeError> {
        let url = self.postcode_url(postcode);

        let response = self.http.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(GeocodeError::Rejected {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let parsed: LookupResponse =
            serde_json::from_str(&body).map_err(|e| GeocodeError::Json {
                message: e.to_string(),
            })?;

        let (Some(latitude), Some(longitude)) = (parsed.result.latitude, parsed.result.longitude)
        else {
            return Err(GeocodeError::NoLocation {
                postcode: postcode.to_string(),
            });
        };

        Ok(Coordinate::new(latitude, longitude)?)
    }
}
