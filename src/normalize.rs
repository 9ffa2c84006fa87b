//! Record normalization: raw upstream person records into the canonical
//! [`Representative`] shape.

use crate::models::{OpenStatesPerson, PartyField, Representative};
use crate::ocd::{self, GovernmentTier};

/// Map one upstream person record onto the canonical representative shape.
///
/// `fallback_division_id` is the division context the record was retrieved
/// under; it supplies the government tier when the record's own role
/// division is missing or does not classify.
pub fn normalize_person(person: &OpenStatesPerson, fallback_division_id: &str) -> Representative {
    let role = person.current_role.as_ref();

    let party = match &person.party {
        Some(PartyField::Roster(memberships)) => memberships.first().and_then(|m| m.name.clone()),
        Some(PartyField::Name(name)) => Some(name.clone()),
        None => None,
    };

    // First link with a non-empty URL wins
    let website = person
        .links
        .iter()
        .find_map(|link| link.url.as_deref().filter(|url| !url.is_empty()))
        .map(str::to_string);

    let jurisdiction = person
        .jurisdiction
        .as_ref()
        .and_then(|j| j.name.clone())
        .unwrap_or_else(|| "Unknown".to_string());

    let government_level = role
        .and_then(|r| r.division_id.as_deref())
        .and_then(|division_id| ocd::classify_tier(division_id).ok())
        .or_else(|| ocd::classify_tier(fallback_division_id).ok())
        .unwrap_or(GovernmentTier::Local);

    Representative {
        id: person.id.clone(),
        name: person.name.clone().unwrap_or_default(),
        office: role.and_then(|r| r.title.clone()).unwrap_or_default(),
        party,
        email: person.email.clone(),
        phone: person.capitol_office.as_ref().and_then(|o| o.voice.clone()),
        address: person
            .capitol_office
            .as_ref()
            .and_then(|o| o.address.clone()),
        website,
        photo_url: person.image.clone(),
        government_level,
        jurisdiction,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        CapitolOffice, CurrentRole, PartyMembership, PersonJurisdiction, PersonLink,
    };

    const STATE_WA: &str = "ocd-division/country:us/state:wa";

    fn bare_person(id: &str) -> OpenStatesPerson {
        OpenStatesPerson {
            id: id.to_string(),
            name: None,
            party: None,
            email: None,
            image: None,
            current_role: None,
            capitol_office: None,
            links: Vec::new(),
            jurisdiction: None,
        }
    }

    #[test]
    fn test_full_record_normalizes() {
        let person = OpenStatesPerson {
            id: "ocd-person/1".to_string(),
            name: Some("Jane Smith".to_string()),
            party: Some(PartyField::Roster(vec![PartyMembership {
                name: Some("Democratic".to_string()),
            }])),
            email: Some("jane.smith@example.gov".to_string()),
            image: Some("https://example.com/jane.jpg".to_string()),
            current_role: Some(CurrentRole {
                title: Some("State Senator".to_string()),
                division_id: Some("ocd-division/country:us/state:wa/sldu:43".to_string()),
            }),
            capitol_office: Some(CapitolOffice {
                voice: Some("360-786-7667".to_string()),
                address: Some("123 Capitol Way, Olympia, WA 98504".to_string()),
            }),
            links: vec![PersonLink {
                url: Some("https://jane.smith.wa.gov".to_string()),
            }],
            jurisdiction: Some(PersonJurisdiction {
                name: Some("Washington".to_string()),
            }),
        };

        let rep = normalize_person(&person, STATE_WA);
        assert_eq!(rep.id, "ocd-person/1");
        assert_eq!(rep.name, "Jane Smith");
        assert_eq!(rep.office, "State Senator");
        assert_eq!(rep.party.as_deref(), Some("Democratic"));
        assert_eq!(rep.email.as_deref(), Some("jane.smith@example.gov"));
        assert_eq!(rep.phone.as_deref(), Some("360-786-7667"));
        assert_eq!(
            rep.address.as_deref(),
            Some("123 Capitol Way, Olympia, WA 98504")
        );
        assert_eq!(rep.website.as_deref(), Some("https://jane.smith.wa.gov"));
        assert_eq!(rep.photo_url.as_deref(), Some("https://example.com/jane.jpg"));
        assert_eq!(rep.government_level, GovernmentTier::State);
        assert_eq!(rep.jurisdiction, "Washington");
    }

    #[test]
    fn test_sparse_record_gets_defaults() {
        let rep = normalize_person(&bare_person("ocd-person/2"), STATE_WA);
        assert_eq!(rep.name, "");
        assert_eq!(rep.office, "");
        assert_eq!(rep.party, None);
        assert_eq!(rep.email, None);
        assert_eq!(rep.phone, None);
        assert_eq!(rep.address, None);
        assert_eq!(rep.website, None);
        assert_eq!(rep.photo_url, None);
        assert_eq!(rep.jurisdiction, "Unknown");
        // Tier comes from the lookup context
        assert_eq!(rep.government_level, GovernmentTier::State);
    }

    #[test]
    fn test_party_bare_string() {
        let mut person = bare_person("ocd-person/3");
        person.party = Some(PartyField::Name("Republican".to_string()));
        let rep = normalize_person(&person, STATE_WA);
        assert_eq!(rep.party.as_deref(), Some("Republican"));
    }

    #[test]
    fn test_party_roster_first_entry_wins() {
        let mut person = bare_person("ocd-person/4");
        person.party = Some(PartyField::Roster(vec![
            PartyMembership {
                name: Some("Democratic".to_string()),
            },
            PartyMembership {
                name: Some("Working Families".to_string()),
            },
        ]));
        let rep = normalize_person(&person, STATE_WA);
        assert_eq!(rep.party.as_deref(), Some("Democratic"));
    }

    #[test]
    fn test_party_empty_roster_is_none() {
        let mut person = bare_person("ocd-person/5");
        person.party = Some(PartyField::Roster(Vec::new()));
        let rep = normalize_person(&person, STATE_WA);
        assert_eq!(rep.party, None);
    }

    #[test]
    fn test_website_skips_empty_urls() {
        let mut person = bare_person("ocd-person/6");
        person.links = vec![
            PersonLink { url: None },
            PersonLink {
                url: Some(String::new()),
            },
            PersonLink {
                url: Some("https://example.gov".to_string()),
            },
        ];
        let rep = normalize_person(&person, STATE_WA);
        assert_eq!(rep.website.as_deref(), Some("https://example.gov"));
    }

    #[test]
    fn test_role_division_outranks_fallback() {
        let mut person = bare_person("ocd-person/7");
        person.current_role = Some(CurrentRole {
            title: Some("Representative".to_string()),
            division_id: Some("ocd-division/country:us/state:wa/cd:7".to_string()),
        });
        // Fallback says state, the role's own division says federal
        let rep = normalize_person(&person, STATE_WA);
        assert_eq!(rep.government_level, GovernmentTier::Federal);
    }

    #[test]
    fn test_unclassifiable_role_division_uses_fallback() {
        let mut person = bare_person("ocd-person/8");
        person.current_role = Some(CurrentRole {
            title: None,
            division_id: Some("not-an-ocd-id".to_string()),
        });
        let rep = normalize_person(&person, STATE_WA);
        assert_eq!(rep.government_level, GovernmentTier::State);
    }

    #[test]
    fn test_unclassifiable_fallback_defaults_local() {
        let rep = normalize_person(&bare_person("ocd-person/9"), "garbage");
        assert_eq!(rep.government_level, GovernmentTier::Local);
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let mut person = bare_person("ocd-person/10");
        person.name = Some("Alex Doe".to_string());
        person.party = Some(PartyField::Name("Independent".to_string()));

        let first = normalize_person(&person, STATE_WA);
        let second = normalize_person(&person, STATE_WA);
        assert_eq!(first, second);
    }
}
