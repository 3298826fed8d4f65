//! Maps web-service HTTP client.
//!
//! Speaks the Nearby Search and Distance Matrix JSON endpoints. Handles
//! authentication, concurrency limiting, and conversion to domain types.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tokio::sync::Semaphore;

use crate::domain::{CandidateRecord, Coordinate};
use crate::pipeline::{DistanceMatrix, MatrixElement, NearbyRequest, PlaceSearch, ProviderError};

use super::convert::{convert_matrix, convert_nearby};
use super::error::MapsError;
use super::types::{DistanceMatrixResponse, NearbySearchResponse};

/// Default base URL for the maps web services.
const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 4;

/// Configuration for the maps client.
#[derive(Debug, Clone)]
pub struct MapsConfig {
    /// API key sent as the `key` query parameter
    pub api_key: String,
    /// Base URL for the API (defaults to production)
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Preferred language for names and addresses, e.g. `zh-HK`
    pub language: Option<String>,
}

impl MapsConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 10,
            language: None,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}

/// Maps web-service client.
///
/// Uses a semaphore to cap concurrent requests across all searches sharing
/// the client.
#[derive(Debug, Clone)]
pub struct MapsClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    language: Option<String>,
    semaphore: Arc<Semaphore>,
}

impl MapsClient {
    /// Create a new client with the given configuration.
    pub fn new(config: MapsConfig) -> Result<Self, MapsError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
            language: config.language,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
        })
    }

    /// One keyword search around `request.origin`.
    pub async fn nearby_search(
        &self,
        request: &NearbyRequest,
    ) -> Result<Vec<CandidateRecord>, MapsError> {
        let mut query = vec![
            ("location", request.origin.to_string()),
            ("radius", request.radius_m.to_string()),
            ("keyword", request.keyword.clone()),
        ];
        if let Some(type_hint) = &request.type_hint {
            query.push(("type", type_hint.clone()));
        }
        if let Some(language) = &self.language {
            query.push(("language", language.clone()));
        }

        let response: NearbySearchResponse =
            self.get_json("place/nearbysearch/json", query).await?;
        convert_nearby(response)
    }

    /// Driving times from `origin` to each destination, in order.
    pub async fn distance_matrix(
        &self,
        origin: Coordinate,
        destinations: &[Coordinate],
    ) -> Result<Vec<MatrixElement>, MapsError> {
        let destinations = destinations
            .iter()
            .map(Coordinate::to_string)
            .collect::<Vec<_>>()
            .join("|");

        let mut query = vec![
            ("origins", origin.to_string()),
            ("destinations", destinations),
            ("mode", "driving".to_string()),
            ("units", "metric".to_string()),
        ];
        if let Some(language) = &self.language {
            query.push(("language", language.clone()));
        }

        let response: DistanceMatrixResponse = self.get_json("distancematrix/json", query).await?;
        convert_matrix(response)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        mut query: Vec<(&str, String)>,
    ) -> Result<T, MapsError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| MapsError::ApiError {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        query.push(("key", self.api_key.clone()));
        let url = format!("{}/{}", self.base_url, endpoint);

        let response = self.http.get(&url).query(&query).send().await?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(MapsError::Unauthorized);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(MapsError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MapsError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| MapsError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(500).collect()),
        })
    }
}

impl PlaceSearch for MapsClient {
    async fn nearby(&self, request: &NearbyRequest) -> Result<Vec<CandidateRecord>, ProviderError> {
        Ok(self.nearby_search(request).await?)
    }
}

impl DistanceMatrix for MapsClient {
    async fn driving_times(
        &self,
        origin: Coordinate,
        destinations: &[Coordinate],
    ) -> Result<Vec<MatrixElement>, ProviderError> {
        Ok(self.distance_matrix(origin, destinations).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder() {
        let config = MapsConfig::new("test-key")
            .with_base_url("http://localhost:8080")
            .with_max_concurrent(10)
            .with_timeout(60)
            .with_language("zh-HK");

        assert_eq!(config.api_key, "test-key");
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.max_concurrent, 10);
        assert_eq!(config.timeout_secs, 60);
        assert_eq!(config.language.as_deref(), Some("zh-HK"));
    }

    #[test]
    fn config_defaults() {
        let config = MapsConfig::new("test-key");

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.max_concurrent, DEFAULT_MAX_CONCURRENT);
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.language, None);
    }

    #[test]
    fn client_creation_trims_trailing_slash() {
        let client = MapsClient::new(MapsConfig::new("k").with_base_url("http://x/api/")).unwrap();
        assert_eq!(client.base_url, "http://x/api");
    }
}
