//! Per-request orchestration: resolve an address through the configured
//! flow, drive the aggregator source by source, and assemble the flow's
//! response shape.

use crate::aggregation::{assemble_flat, assemble_grouped, Aggregator};
use crate::errors::{AppError, ResultExt};
use crate::models::{GroupedRepresentativesResponse, RepresentativesResponse};
use crate::ocd::{self, GovernmentTier, US_COUNTRY_ROOT};
use crate::services::{GoogleCivicService, GoogleMapsService, OpenStatesService};
use crate::validation::validate_coordinates;

/// Division-enumeration flow: enumerate the divisions covering the address,
/// query the directory once per state-tier division, and aggregate.
pub async fn lookup_by_divisions(
    address: &str,
    civic: &GoogleCivicService,
    directory: &OpenStatesService,
) -> Result<RepresentativesResponse, AppError> {
    let divisions = civic
        .lookup_divisions(address)
        .await
        .context("retrieving divisions for address")?;
    tracing::info!("Found {} divisions", divisions.len());

    let mut aggregator = Aggregator::new();
    for division in &divisions {
        // The directory only indexes state legislators; divisions of other
        // tiers are skipped before querying and contribute no warning.
        let Some(state_code) = state_query_key(&division.ocd_id) else {
            tracing::debug!("Skipping non-state division: {}", division.ocd_id);
            continue;
        };

        let source = format!("{} ({})", division.name, division.ocd_id);
        let outcome = directory.query_by_jurisdiction(&state_code).await;
        aggregator.ingest(&source, &division.ocd_id, outcome)?;
    }

    let result = aggregator.finish();
    tracing::info!(
        "Lookup complete: {} unique representatives found",
        result.representatives.len()
    );

    Ok(assemble_flat(address, divisions.len(), result))
}

/// Point-query flow: geocode the address once and issue a single
/// coordinate query spanning all tiers.
pub async fn lookup_by_point(
    address: &str,
    maps: &GoogleMapsService,
    directory: &OpenStatesService,
) -> Result<GroupedRepresentativesResponse, AppError> {
    let geocode = maps
        .geocode(address)
        .await
        .context("geocoding address")?
        .ok_or_else(|| {
            AppError::InvalidAddress("Address could not be geocoded to a location".to_string())
        })?;

    validate_coordinates(geocode.latitude, geocode.longitude)?;

    // A failure here has no sibling sources to degrade to; it propagates.
    let outcome = directory
        .query_by_coordinates(geocode.latitude, geocode.longitude)
        .await
        .context("querying representatives by location")?;

    let mut aggregator = Aggregator::new();
    aggregator.ingest("coordinate query", US_COUNTRY_ROOT, Ok(outcome))?;

    let result = aggregator.finish();
    tracing::info!(
        "Lookup complete: {} unique representatives found",
        result.representatives.len()
    );

    Ok(assemble_grouped(&geocode, result))
}

/// Extract the directory query key for a division. Only state-tier
/// divisions carry a usable two-letter state code; anything else (or an
/// identifier that fails to decompose) yields `None`.
fn state_query_key(ocd_id: &str) -> Option<String> {
    let components = match ocd::decompose(ocd_id) {
        Ok(components) => components,
        Err(err) => {
            tracing::warn!("Invalid OCD-ID from divisions lookup: {}", err);
            return None;
        }
    };

    if components.tier != GovernmentTier::State {
        return None;
    }
    components.state
}
