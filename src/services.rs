//! HTTP clients for the external collaborators: the divisions lookup, the
//! geocoder, and the people directory. Each client maps upstream failures
//! onto the [`AppError`] taxonomy; the aggregation layer decides which of
//! those are fatal.

use reqwest::Client;
use std::time::Duration;
use url::Url;

use crate::config::Config;
use crate::errors::AppError;
use crate::models::{
    Division, DivisionsByAddressResponse, GeocodeResponse, GeocodeResult, OpenStatesPerson,
    PeopleEnvelope,
};

/// Maps a transport-level failure onto the error taxonomy, distinguishing
/// timeouts from connection problems.
fn request_error(service: &str, err: reqwest::Error) -> AppError {
    if err.is_timeout() {
        tracing::error!("Timeout calling {} API: {}", service, err);
        AppError::ExternalServiceError {
            message: format!(
                "{} API request timed out. Service may be unavailable.",
                service
            ),
            details: Some(err.to_string()),
        }
    } else {
        tracing::error!("Connection error calling {} API: {}", service, err);
        AppError::ExternalServiceError {
            message: format!(
                "Unable to connect to {} API. Service may be unavailable.",
                service
            ),
            details: Some(err.to_string()),
        }
    }
}

/// Pulls a human-readable message out of an upstream error body. Handles
/// both `{"error": "..."}` and `{"error": {"message": "..."}}` shapes.
async fn upstream_error_message(response: reqwest::Response) -> String {
    let fallback = "Unknown error".to_string();
    let Ok(body) = response.json::<serde_json::Value>().await else {
        return fallback;
    };
    match body.get("error") {
        Some(serde_json::Value::String(message)) => message.clone(),
        Some(object) => object
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or("Unknown error")
            .to_string(),
        None => fallback,
    }
}

// ============ Divisions Lookup ============

pub struct GoogleCivicService {
    client: Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl GoogleCivicService {
    pub fn new(config: &Config, api_key: String) -> Self {
        Self {
            client: Client::new(),
            base_url: config.google_civic_base_url.clone(),
            api_key,
            timeout: Duration::from_secs(config.directory_timeout_secs),
        }
    }

    /// Look up the political divisions covering an address.
    ///
    /// An upstream 404 means the address resolved to no divisions and is a
    /// hard `AddressNotFound`; a 429 is `RateLimitExceeded`.
    pub async fn lookup_divisions(&self, address: &str) -> Result<Vec<Division>, AppError> {
        // Build URL with proper parameter encoding
        let url = Url::parse_with_params(
            &format!("{}/divisionsByAddress", self.base_url),
            &[("address", address), ("key", self.api_key.as_str())],
        )
        .map_err(|e| AppError::InternalError(format!("Failed to build URL: {}", e)))?;

        tracing::info!("Looking up divisions for address ({} chars)", address.len());

        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| request_error("Google Civic", e))?;

        let status = response.status();
        if status.as_u16() == 404 {
            let message = upstream_error_message(response).await;
            tracing::warn!("Address not found: {}", message);
            return Err(AppError::AddressNotFound(format!(
                "No divisions found for the provided address: {}",
                message
            )));
        }
        if status.as_u16() == 429 {
            tracing::error!("Rate limit exceeded for Google Civic API");
            let details = upstream_error_message(response).await;
            return Err(AppError::RateLimitExceeded {
                message: "Google Civic API rate limit exceeded. Please try again later."
                    .to_string(),
                details: Some(details),
            });
        }
        if !status.is_success() {
            tracing::error!(
                "Unexpected status code from Google Civic API: {}",
                status.as_u16()
            );
            return Err(AppError::ExternalServiceError {
                message: format!("Google Civic API returned error: {}", status.as_u16()),
                details: None,
            });
        }

        let body: DivisionsByAddressResponse =
            response
                .json()
                .await
                .map_err(|e| AppError::ExternalServiceError {
                    message: "Failed to parse Google Civic response".to_string(),
                    details: Some(e.to_string()),
                })?;

        let divisions: Vec<Division> = body
            .divisions
            .into_iter()
            .map(|(ocd_id, info)| Division {
                ocd_id,
                name: info.name.unwrap_or_default(),
            })
            .collect();

        tracing::info!("Successfully retrieved {} divisions", divisions.len());
        Ok(divisions)
    }
}

// ============ Geocoding ============

pub struct GoogleMapsService {
    client: Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl GoogleMapsService {
    pub fn new(config: &Config, api_key: String) -> Self {
        Self {
            client: Client::new(),
            base_url: config.google_maps_base_url.clone(),
            api_key,
            timeout: Duration::from_secs(config.geocode_timeout_secs),
        }
    }

    /// Geocode a street address to coordinates.
    ///
    /// Returns `None` when the address cannot be resolved to a location.
    /// The first candidate wins for ambiguous addresses.
    pub async fn geocode(&self, address: &str) -> Result<Option<GeocodeResult>, AppError> {
        let url = Url::parse_with_params(
            &format!("{}/maps/api/geocode/json", self.base_url),
            &[("address", address), ("key", self.api_key.as_str())],
        )
        .map_err(|e| AppError::InternalError(format!("Failed to build URL: {}", e)))?;

        tracing::info!("Geocoding address ({} chars)", address.len());

        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| request_error("Google Maps", e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!(
                "Unexpected status code from Google Maps API: {}",
                status.as_u16()
            );
            return Err(AppError::ExternalServiceError {
                message: format!("Google Maps API returned error: {}", status.as_u16()),
                details: None,
            });
        }

        let body: GeocodeResponse =
            response
                .json()
                .await
                .map_err(|e| AppError::ExternalServiceError {
                    message: "Failed to parse Google Maps response".to_string(),
                    details: Some(e.to_string()),
                })?;

        match body.status.as_str() {
            "OK" => {}
            "ZERO_RESULTS" => {
                tracing::info!("No geocoding results found for address");
                return Ok(None);
            }
            "OVER_QUERY_LIMIT" => {
                tracing::error!("Rate limit exceeded for Google Maps API");
                return Err(AppError::RateLimitExceeded {
                    message: "Google Maps API rate limit exceeded. Please try again later."
                        .to_string(),
                    details: None,
                });
            }
            "REQUEST_DENIED" | "INVALID_REQUEST" => {
                tracing::error!("Google Maps API rejected the request: {}", body.status);
                return Err(AppError::ExternalServiceError {
                    message: "Google Maps API key authentication error".to_string(),
                    details: Some(body.status),
                });
            }
            other => {
                tracing::error!("Google Maps API error status: {}", other);
                return Err(AppError::ExternalServiceError {
                    message: format!("Google Maps API error: {}", other),
                    details: None,
                });
            }
        }

        let Some(first) = body.results.first() else {
            tracing::info!("No geocoding results found for address");
            return Ok(None);
        };

        tracing::info!(
            latitude = first.geometry.location.lat,
            longitude = first.geometry.location.lng,
            "Geocoding successful"
        );

        Ok(Some(GeocodeResult {
            latitude: first.geometry.location.lat,
            longitude: first.geometry.location.lng,
            formatted_address: first.formatted_address.clone(),
        }))
    }
}

// ============ People Directory ============

pub struct OpenStatesService {
    client: Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl OpenStatesService {
    /// Page size cap imposed by the directory.
    const PER_PAGE: &'static str = "50";

    pub fn new(config: &Config, api_key: String) -> Self {
        Self {
            client: Client::new(),
            base_url: config.openstates_base_url.clone(),
            api_key,
            timeout: Duration::from_secs(config.directory_timeout_secs),
        }
    }

    /// Query state legislators for a two-letter jurisdiction code.
    pub async fn query_by_jurisdiction(
        &self,
        jurisdiction: &str,
    ) -> Result<Vec<OpenStatesPerson>, AppError> {
        let url = Url::parse_with_params(
            &format!("{}/people", self.base_url),
            &[("jurisdiction", jurisdiction), ("per_page", Self::PER_PAGE)],
        )
        .map_err(|e| AppError::InternalError(format!("Failed to build URL: {}", e)))?;

        tracing::info!("Querying directory with jurisdiction: {}", jurisdiction);
        self.fetch_people(url).await
    }

    /// Query legislators across all tiers for a coordinate pair.
    pub async fn query_by_coordinates(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<OpenStatesPerson>, AppError> {
        let url = Url::parse_with_params(
            &format!("{}/people.geo", self.base_url),
            &[
                ("lat", latitude.to_string().as_str()),
                ("lng", longitude.to_string().as_str()),
            ],
        )
        .map_err(|e| AppError::InternalError(format!("Failed to build URL: {}", e)))?;

        tracing::info!(latitude, longitude, "Querying directory by coordinates");
        self.fetch_people(url).await
    }

    async fn fetch_people(&self, url: Url) -> Result<Vec<OpenStatesPerson>, AppError> {
        let response = self
            .client
            .get(url)
            .header("X-API-Key", &self.api_key)
            .header("Accept", "application/json")
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| request_error("OpenStates", e))?;

        let status = response.status();
        if status.as_u16() == 429 {
            tracing::error!("Rate limit exceeded for OpenStates API");
            let details = upstream_error_message(response).await;
            return Err(AppError::RateLimitExceeded {
                message: "OpenStates API rate limit exceeded. Please try again later.".to_string(),
                details: Some(details),
            });
        }
        if status.as_u16() == 401 {
            tracing::error!("Invalid API key for OpenStates API");
            return Err(AppError::ExternalServiceError {
                message: "OpenStates API authentication failed".to_string(),
                details: Some("Invalid API key".to_string()),
            });
        }
        if !status.is_success() {
            tracing::error!(
                "Unexpected status code from OpenStates API: {}",
                status.as_u16()
            );
            return Err(AppError::ExternalServiceError {
                message: format!("OpenStates API returned error: {}", status.as_u16()),
                details: None,
            });
        }

        let body: PeopleEnvelope =
            response
                .json()
                .await
                .map_err(|e| AppError::ExternalServiceError {
                    message: "Failed to parse OpenStates response".to_string(),
                    details: Some(e.to_string()),
                })?;

        tracing::info!("Successfully retrieved {} people records", body.results.len());
        Ok(body.results)
    }
}
