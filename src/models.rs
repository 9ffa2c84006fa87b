use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::ocd::GovernmentTier;

// ============ Canonical Domain Models ============

/// A single elected representative, normalized from an upstream directory
/// record.
///
/// Immutable once constructed; lives only for the duration of one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Representative {
    /// Stable upstream person identifier. Deduplication key within one
    /// response.
    pub id: String,
    /// Full legal name.
    pub name: String,
    /// Position title (e.g. "State Senator").
    pub office: String,
    /// Party affiliation, when known.
    pub party: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Capitol office phone number.
    pub phone: Option<String>,
    /// Capitol office mailing address.
    pub address: Option<String>,
    /// Official website URL.
    pub website: Option<String>,
    /// Photo URL, passed through unvalidated.
    pub photo_url: Option<String>,
    /// Government tier this office belongs to.
    pub government_level: GovernmentTier,
    /// Human-readable jurisdiction name (e.g. "Washington").
    pub jurisdiction: String,
}

/// A political division returned by the divisions collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Division {
    /// OCD division identifier.
    pub ocd_id: String,
    /// Human-readable division name.
    pub name: String,
}

/// Geocoding result for a street address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodeResult {
    pub latitude: f64,
    pub longitude: f64,
    /// Canonical address as formatted by the geocoder.
    pub formatted_address: String,
}

// ============ Upstream Payloads: People Directory ============

/// Envelope around the people directory's result list.
#[derive(Debug, Clone, Deserialize)]
pub struct PeopleEnvelope {
    #[serde(default)]
    pub results: Vec<OpenStatesPerson>,
}

/// One person record as returned by the people directory.
///
/// Everything except `id` may be absent upstream; a missing `id` is a
/// contract violation and fails deserialization of the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenStatesPerson {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub party: Option<PartyField>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub current_role: Option<CurrentRole>,
    #[serde(default)]
    pub capitol_office: Option<CapitolOffice>,
    #[serde(default)]
    pub links: Vec<PersonLink>,
    #[serde(default)]
    pub jurisdiction: Option<PersonJurisdiction>,
}

/// Party affiliation arrives either as an ordered roster of membership
/// objects or as a bare string, depending on the upstream endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PartyField {
    Roster(Vec<PartyMembership>),
    Name(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartyMembership {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentRole {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub division_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapitolOffice {
    /// Voice phone number.
    #[serde(default)]
    pub voice: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonLink {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonJurisdiction {
    #[serde(default)]
    pub name: Option<String>,
}

// ============ Upstream Payloads: Divisions Lookup ============

/// `divisionsByAddress` response body.
///
/// The divisions object is keyed by OCD-ID; a `BTreeMap` keeps iteration
/// deterministic (JSON object order is not guaranteed), so divisions are
/// processed in OCD-ID order.
#[derive(Debug, Clone, Deserialize)]
pub struct DivisionsByAddressResponse {
    #[serde(default)]
    pub divisions: BTreeMap<String, DivisionInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DivisionInfo {
    #[serde(default)]
    pub name: Option<String>,
}

// ============ Upstream Payloads: Geocoding ============

#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub results: Vec<GeocodeCandidate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeCandidate {
    pub formatted_address: String,
    pub geometry: Geometry,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

// ============ Response Contracts ============

/// Flat response shape produced by the division-enumeration flow.
#[derive(Debug, Clone, Serialize)]
pub struct RepresentativesResponse {
    /// The user-supplied address, echoed verbatim.
    pub address: String,
    /// Deduplicated representatives in insertion order.
    pub representatives: Vec<Representative>,
    pub metadata: LookupMetadata,
    /// Partial-failure and coverage warnings, in order of occurrence.
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LookupMetadata {
    pub address: String,
    /// Number of divisions returned for the address, including divisions
    /// that were skipped before querying.
    pub division_count: usize,
    pub representative_count: usize,
    /// Distinct tiers observed, sorted alphabetically.
    pub government_levels: Vec<String>,
    pub response_time_ms: u64,
}

/// Grouped response shape produced by the point-query flow.
#[derive(Debug, Clone, Serialize)]
pub struct GroupedRepresentativesResponse {
    pub representatives: GroupedRepresentatives,
    pub metadata: GroupedMetadata,
    pub warnings: Vec<String>,
}

/// Representatives bucketed by tier. Every bucket is always present, empty
/// when that tier has none.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GroupedRepresentatives {
    pub federal: Vec<Representative>,
    pub state: Vec<Representative>,
    pub local: Vec<Representative>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupedMetadata {
    /// Address as formatted by the geocoder.
    pub address: String,
    pub coordinates: Coordinates,
    pub total_count: usize,
    /// Tiers with at least one representative, sorted alphabetically.
    pub government_levels: Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Either response shape, decided by the configured resolution flow.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum LookupResponse {
    Flat(RepresentativesResponse),
    Grouped(GroupedRepresentativesResponse),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_person_deserializes_with_only_id() {
        let person: OpenStatesPerson = serde_json::from_str(r#"{"id": "ocd-person/abc"}"#).unwrap();
        assert_eq!(person.id, "ocd-person/abc");
        assert_eq!(person.name, None);
        assert_eq!(person.party, None);
        assert!(person.links.is_empty());
    }

    #[test]
    fn test_person_without_id_is_rejected() {
        let result: Result<OpenStatesPerson, _> = serde_json::from_str(r#"{"name": "Jane"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_party_field_accepts_roster_and_bare_string() {
        let roster: PartyField = serde_json::from_str(r#"[{"name": "Democratic"}]"#).unwrap();
        assert_eq!(
            roster,
            PartyField::Roster(vec![PartyMembership {
                name: Some("Democratic".to_string())
            }])
        );

        let bare: PartyField = serde_json::from_str(r#""Republican""#).unwrap();
        assert_eq!(bare, PartyField::Name("Republican".to_string()));
    }

    #[test]
    fn test_divisions_map_iterates_in_key_order() {
        let body: DivisionsByAddressResponse = serde_json::from_str(
            r#"{"divisions": {
                "ocd-division/country:us/state:wa": {"name": "Washington"},
                "ocd-division/country:us": {"name": "United States"}
            }}"#,
        )
        .unwrap();

        let keys: Vec<&String> = body.divisions.keys().collect();
        assert_eq!(
            keys,
            vec![
                "ocd-division/country:us",
                "ocd-division/country:us/state:wa"
            ]
        );
    }
}
