//! Open Civic Data division identifier parsing.
//!
//! OCD identifiers are slash-delimited `type:value` paths rooted at a
//! country, e.g. `ocd-division/country:us/state:wa/cd:7`. This module
//! classifies an identifier into a government tier and decomposes it into
//! its components. Only US identifiers are supported.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Required prefix of every division identifier.
pub const OCD_PREFIX: &str = "ocd-division/";

/// The country-root identifier, also the classification fallback for
/// point-query records that carry no division of their own.
pub const US_COUNTRY_ROOT: &str = "ocd-division/country:us";

/// Government tier of a representative's office.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GovernmentTier {
    Federal,
    State,
    Local,
}

impl GovernmentTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            GovernmentTier::Federal => "federal",
            GovernmentTier::State => "state",
            GovernmentTier::Local => "local",
        }
    }
}

impl fmt::Display for GovernmentTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification failures. Callers decide whether a failure means "skip
/// this division" or a hard error; it is never swallowed here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OcdError {
    /// The identifier does not start with the `ocd-division/` root marker.
    InvalidFormat(String),
    /// The identifier names a country other than the US.
    UnsupportedCountry(String),
}

impl fmt::Display for OcdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OcdError::InvalidFormat(id) => write!(f, "Invalid OCD-ID format: {}", id),
            OcdError::UnsupportedCountry(id) => write!(f, "Non-US OCD-ID not supported: {}", id),
        }
    }
}

impl std::error::Error for OcdError {}

/// Division types recognized by [`decompose`], in lookup priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DivisionKind {
    CongressionalDistrict,
    StateUpper,
    StateLower,
    County,
    Place,
    District,
}

impl DivisionKind {
    /// Segment key as it appears in the identifier.
    pub fn key(&self) -> &'static str {
        match self {
            DivisionKind::CongressionalDistrict => "cd",
            DivisionKind::StateUpper => "sldu",
            DivisionKind::StateLower => "sldl",
            DivisionKind::County => "county",
            DivisionKind::Place => "place",
            DivisionKind::District => "district",
        }
    }
}

/// Structured view of a division identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct OcdComponents {
    /// Country code (always `us` for supported identifiers).
    pub country: String,
    /// Two-letter state code, when the identifier has a state segment.
    pub state: Option<String>,
    /// First recognized division type and its value, by priority order.
    pub division: Option<(DivisionKind, String)>,
    /// Derived government tier.
    pub tier: GovernmentTier,
}

fn cd_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"/cd:\d+").unwrap())
}

fn county_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"/county:[a-z_]+").unwrap())
}

fn place_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"/place:[a-z_]+").unwrap())
}

fn sldu_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"/sldu:\d+").unwrap())
}

fn sldl_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"/sldl:\d+").unwrap())
}

fn state_only_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^country:us/state:[a-z]{2}$").unwrap())
}

/// Determine the government tier of a division identifier.
///
/// Pattern order matters: a congressional district also contains a state
/// segment, and a county also sits under a state. The first matching rule
/// wins.
pub fn classify_tier(ocd_id: &str) -> Result<GovernmentTier, OcdError> {
    if ocd_id.is_empty() || !ocd_id.starts_with(OCD_PREFIX) {
        return Err(OcdError::InvalidFormat(ocd_id.to_string()));
    }
    if !ocd_id.contains("country:us") {
        return Err(OcdError::UnsupportedCountry(ocd_id.to_string()));
    }

    let parts = &ocd_id[OCD_PREFIX.len()..];

    // Congressional district
    if cd_pattern().is_match(parts) {
        return Ok(GovernmentTier::Federal);
    }

    // Country root, including the stateless capital district
    if parts == "country:us" || parts == "country:us/district:dc" {
        return Ok(GovernmentTier::Federal);
    }

    // County
    if county_pattern().is_match(parts) {
        return Ok(GovernmentTier::Local);
    }

    // Place / city
    if place_pattern().is_match(parts) {
        return Ok(GovernmentTier::Local);
    }

    // State legislature, upper then lower chamber
    if sldu_pattern().is_match(parts) {
        return Ok(GovernmentTier::State);
    }
    if sldl_pattern().is_match(parts) {
        return Ok(GovernmentTier::State);
    }

    // State-wide identifier with no further segments
    if state_only_pattern().is_match(parts) {
        return Ok(GovernmentTier::State);
    }

    // Anything else under a state defaults to state
    if parts.contains("/state:") {
        return Ok(GovernmentTier::State);
    }

    // Unrecognized subdivisions are treated as local
    Ok(GovernmentTier::Local)
}

/// Decompose a division identifier into its components.
///
/// Fails under the same conditions as [`classify_tier`]. When several
/// recognized division segments are present, the first by priority order
/// (cd, sldu, sldl, county, place, district) is reported.
pub fn decompose(ocd_id: &str) -> Result<OcdComponents, OcdError> {
    let tier = classify_tier(ocd_id)?;

    let parts = &ocd_id[OCD_PREFIX.len()..];
    let segments: Vec<(&str, &str)> = parts
        .split('/')
        .filter_map(|segment| segment.split_once(':'))
        .collect();

    let lookup = |key: &str| {
        segments
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.to_string())
    };

    const PRIORITY: [DivisionKind; 6] = [
        DivisionKind::CongressionalDistrict,
        DivisionKind::StateUpper,
        DivisionKind::StateLower,
        DivisionKind::County,
        DivisionKind::Place,
        DivisionKind::District,
    ];

    let division = PRIORITY
        .iter()
        .find_map(|kind| lookup(kind.key()).map(|value| (*kind, value)));

    Ok(OcdComponents {
        country: lookup("country").unwrap_or_default(),
        state: lookup("state"),
        division,
        tier,
    })
}
