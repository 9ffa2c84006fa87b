//! Merge, dedupe, and coverage accounting across legislator sources.
//!
//! A source is one unit of upstream data: a single division's directory
//! query in the division-enumeration flow, or the one coordinate query in
//! the point-query flow. Sources are folded into an [`Aggregator`] one at a
//! time; closing it out yields an [`AggregationResult`] the response
//! assemblers shape into the public contracts.

use std::collections::HashSet;
use std::time::Instant;

use crate::errors::AppError;
use crate::models::{
    Coordinates, GeocodeResult, GroupedMetadata, GroupedRepresentatives,
    GroupedRepresentativesResponse, LookupMetadata, OpenStatesPerson, Representative,
    RepresentativesResponse,
};
use crate::normalize::normalize_person;
use crate::ocd::GovernmentTier;

const ALL_TIERS: [GovernmentTier; 3] = [
    GovernmentTier::Federal,
    GovernmentTier::State,
    GovernmentTier::Local,
];

/// Outcome of merging every source.
#[derive(Debug, Clone)]
pub struct AggregationResult {
    /// Deduplicated representatives in first-seen order.
    pub representatives: Vec<Representative>,
    /// Distinct tiers among the kept representatives.
    pub tiers_seen: HashSet<GovernmentTier>,
    /// Warnings in order of occurrence.
    pub warnings: Vec<String>,
    /// Number of sources folded in, including failed and empty ones.
    pub sources_processed: usize,
    /// Wall-clock time from aggregator construction to finish.
    pub elapsed_ms: u64,
}

impl AggregationResult {
    /// Tier names with at least one kept representative, sorted
    /// alphabetically.
    pub fn government_levels(&self) -> Vec<String> {
        let mut levels: Vec<String> = self
            .tiers_seen
            .iter()
            .map(|tier| tier.as_str().to_string())
            .collect();
        levels.sort();
        levels
    }
}

/// Incremental merge of per-source legislator records.
#[derive(Debug)]
pub struct Aggregator {
    started: Instant,
    representatives: Vec<Representative>,
    seen_ids: HashSet<String>,
    tiers_seen: HashSet<GovernmentTier>,
    warnings: Vec<String>,
    sources_processed: usize,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl Aggregator {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            representatives: Vec::new(),
            seen_ids: HashSet::new(),
            tiers_seen: HashSet::new(),
            warnings: Vec::new(),
            sources_processed: 0,
        }
    }

    /// Fold one source's outcome into the running aggregate.
    ///
    /// Non-fatal upstream failures become warnings and aggregation
    /// continues. A fatal failure (rate-limit exhaustion) is returned
    /// unchanged so the caller stops querying the remaining sources.
    ///
    /// `fallback_division_id` is handed to normalization for tier
    /// classification of records without a usable role division.
    pub fn ingest(
        &mut self,
        source: &str,
        fallback_division_id: &str,
        outcome: Result<Vec<OpenStatesPerson>, AppError>,
    ) -> Result<(), AppError> {
        self.sources_processed += 1;

        let records = match outcome {
            Ok(records) => records,
            Err(err) if err.is_fatal() => return Err(err),
            Err(err) => {
                let warning = format!("Could not retrieve data for {}: {}", source, err.message());
                tracing::warn!("{}", warning);
                self.warnings.push(warning);
                return Ok(());
            }
        };

        // A valid source with no records is expected coverage, not an error
        if records.is_empty() {
            let warning = format!("No representative data available for {}", source);
            tracing::warn!("{}", warning);
            self.warnings.push(warning);
            return Ok(());
        }

        let mut added = 0usize;
        for record in &records {
            let representative = normalize_person(record, fallback_division_id);
            if !self.seen_ids.insert(representative.id.clone()) {
                // Duplicates across sources are routine; the first copy wins
                tracing::debug!("Skipping duplicate representative: {}", representative.id);
                continue;
            }
            self.tiers_seen.insert(representative.government_level);
            self.representatives.push(representative);
            added += 1;
        }

        tracing::info!("Added {} representatives from {}", added, source);
        Ok(())
    }

    /// Close out the aggregation: coverage warnings and elapsed time.
    pub fn finish(mut self) -> AggregationResult {
        if self.representatives.is_empty() {
            self.warnings
                .push("No representative data available for this location".to_string());
        } else {
            let mut missing: Vec<&str> = ALL_TIERS
                .iter()
                .filter(|tier| !self.tiers_seen.contains(tier))
                .map(|tier| tier.as_str())
                .collect();
            missing.sort();
            if !missing.is_empty() {
                self.warnings.push(format!(
                    "No representatives found for government levels: {}",
                    missing.join(", ")
                ));
            }
        }

        AggregationResult {
            representatives: self.representatives,
            tiers_seen: self.tiers_seen,
            warnings: self.warnings,
            sources_processed: self.sources_processed,
            elapsed_ms: self.started.elapsed().as_millis() as u64,
        }
    }
}

/// Build the flat response shape for the division-enumeration flow.
///
/// `division_count` counts every division returned for the address,
/// including ones skipped before querying.
pub fn assemble_flat(
    address: &str,
    division_count: usize,
    result: AggregationResult,
) -> RepresentativesResponse {
    let government_levels = result.government_levels();
    RepresentativesResponse {
        address: address.to_string(),
        metadata: LookupMetadata {
            address: address.to_string(),
            division_count,
            representative_count: result.representatives.len(),
            government_levels,
            response_time_ms: result.elapsed_ms,
        },
        representatives: result.representatives,
        warnings: result.warnings,
    }
}

/// Build the grouped response shape for the point-query flow. Every tier
/// bucket is present even when empty.
pub fn assemble_grouped(
    geocode: &GeocodeResult,
    result: AggregationResult,
) -> GroupedRepresentativesResponse {
    let government_levels = result.government_levels();
    let total_count = result.representatives.len();

    let mut grouped = GroupedRepresentatives::default();
    for representative in result.representatives {
        match representative.government_level {
            GovernmentTier::Federal => grouped.federal.push(representative),
            GovernmentTier::State => grouped.state.push(representative),
            GovernmentTier::Local => grouped.local.push(representative),
        }
    }

    GroupedRepresentativesResponse {
        representatives: grouped,
        metadata: GroupedMetadata {
            address: geocode.formatted_address.clone(),
            coordinates: Coordinates {
                latitude: geocode.latitude,
                longitude: geocode.longitude,
            },
            total_count,
            government_levels,
        },
        warnings: result.warnings,
    }
}
