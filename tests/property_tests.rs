/// Property-based tests using proptest
/// Tests invariants of the tier classifier and the record normalizer
use proptest::prelude::*;
use represent_api::models::OpenStatesPerson;
use represent_api::normalize::normalize_person;
use represent_api::ocd::{classify_tier, decompose, GovernmentTier};

// Property: classification should never panic, whatever the input
proptest! {
    #[test]
    fn classify_never_panics(id in "\\PC*") {
        let _ = classify_tier(&id);
    }

    #[test]
    fn decompose_never_panics(id in "\\PC*") {
        let _ = decompose(&id);
    }
}

// Property: a congressional district segment forces federal, regardless of
// the other segments present
proptest! {
    #[test]
    fn congressional_district_is_always_federal(
        state in "[a-z]{2}",
        district in 1u8..=53
    ) {
        let id = format!("ocd-division/country:us/state:{}/cd:{}", state, district);
        prop_assert_eq!(classify_tier(&id).unwrap(), GovernmentTier::Federal);
    }

    #[test]
    fn congressional_district_beats_local_segments(
        state in "[a-z]{2}",
        county in "[a-z_]{3,10}",
        district in 1u8..=53
    ) {
        let id = format!(
            "ocd-division/country:us/state:{}/county:{}/cd:{}",
            state, county, district
        );
        prop_assert_eq!(classify_tier(&id).unwrap(), GovernmentTier::Federal);
    }
}

// Property: exact country+state is state; county or place flips it to local
proptest! {
    #[test]
    fn state_root_is_state_and_subdivisions_are_local(
        state in "[a-z]{2}",
        subdivision in "[a-z_]{3,10}"
    ) {
        let base = format!("ocd-division/country:us/state:{}", state);
        prop_assert_eq!(classify_tier(&base).unwrap(), GovernmentTier::State);
        prop_assert_eq!(
            classify_tier(&format!("{}/county:{}", base, subdivision)).unwrap(),
            GovernmentTier::Local
        );
        prop_assert_eq!(
            classify_tier(&format!("{}/place:{}", base, subdivision)).unwrap(),
            GovernmentTier::Local
        );
    }

    #[test]
    fn legislative_chambers_are_state(
        state in "[a-z]{2}",
        district in 1u32..=120,
        upper in proptest::bool::ANY
    ) {
        let chamber = if upper { "sldu" } else { "sldl" };
        let id = format!(
            "ocd-division/country:us/state:{}/{}:{}",
            state, chamber, district
        );
        prop_assert_eq!(classify_tier(&id).unwrap(), GovernmentTier::State);
    }
}

// Property: decomposing a state identifier recovers the state code
proptest! {
    #[test]
    fn decompose_recovers_state_code(state in "[a-z]{2}") {
        let id = format!("ocd-division/country:us/state:{}", state);
        let components = decompose(&id).unwrap();
        prop_assert_eq!(components.country, "us");
        prop_assert_eq!(components.state, Some(state));
        prop_assert_eq!(components.tier, GovernmentTier::State);
    }
}

// Property: normalizing the same raw record twice yields identical output
proptest! {
    #[test]
    fn normalization_is_idempotent(
        id in "[a-z0-9/-]{1,24}",
        name in proptest::option::of("[A-Za-z .]{1,30}"),
        email in proptest::option::of("[a-z]{1,8}@[a-z]{1,8}\\.gov")
    ) {
        let person = OpenStatesPerson {
            id,
            name,
            party: None,
            email,
            image: None,
            current_role: None,
            capitol_office: None,
            links: Vec::new(),
            jurisdiction: None,
        };

        let first = normalize_person(&person, "ocd-division/country:us/state:wa");
        let second = normalize_person(&person, "ocd-division/country:us/state:wa");
        prop_assert_eq!(first, second);
    }
}

// Property: every valid US identifier classifies into one of the three
// tiers without error
proptest! {
    #[test]
    fn valid_us_identifiers_always_classify(
        segment_key in "[a-z_]{2,12}",
        segment_value in "[a-z0-9_]{1,12}"
    ) {
        let id = format!("ocd-division/country:us/{}:{}", segment_key, segment_value);
        let tier = classify_tier(&id).unwrap();
        prop_assert!(matches!(
            tier,
            GovernmentTier::Federal | GovernmentTier::State | GovernmentTier::Local
        ));
    }
}
