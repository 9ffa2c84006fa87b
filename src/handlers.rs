use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::config::{Config, ResolutionFlow};
use crate::errors::AppError;
use crate::lookup;
use crate::models::LookupResponse;
use crate::secrets::SecretStore;
use crate::services::{GoogleCivicService, GoogleMapsService, OpenStatesService};
use crate::validation::validate_address;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Read-through cache over the credential provider.
    pub secrets: Arc<SecretStore>,
}

/// Query parameters accepted by the representatives endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct LookupParams {
    pub address: Option<String>,
}

/// Health check endpoint.
///
/// Returns the service status, version, and health information.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "represent-api",
            "version": env!("CARGO_PKG_VERSION"),
        })),
    )
}

/// GET /representatives
///
/// Resolves a civic address into its elected representatives using the
/// resolution flow selected at deployment time. The division-enumeration
/// flow answers with the flat shape, the point-query flow with the
/// tier-grouped shape.
pub async fn get_representatives(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LookupParams>,
) -> Result<Json<LookupResponse>, AppError> {
    tracing::info!("GET /representatives");

    // Validate the address before touching any collaborator
    let address = validate_address(params.address.as_deref())?;

    let directory_key = state
        .secrets
        .get_secret(&state.config.openstates_key_param)
        .await?;
    let directory = OpenStatesService::new(&state.config, directory_key);

    let response = match state.config.resolution_flow {
        ResolutionFlow::DivisionEnumeration => {
            let civic_key = state
                .secrets
                .get_secret(&state.config.google_civic_key_param)
                .await?;
            let civic = GoogleCivicService::new(&state.config, civic_key);
            LookupResponse::Flat(lookup::lookup_by_divisions(&address, &civic, &directory).await?)
        }
        ResolutionFlow::PointQuery => {
            let maps_key = state
                .secrets
                .get_secret(&state.config.google_maps_key_param)
                .await?;
            let maps = GoogleMapsService::new(&state.config, maps_key);
            LookupResponse::Grouped(lookup::lookup_by_point(&address, &maps, &directory).await?)
        }
    };

    Ok(Json(response))
}
