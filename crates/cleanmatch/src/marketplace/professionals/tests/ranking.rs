use super::common::*;
use crate::marketplace::coverage::CoverageArea;
use crate::marketplace::professionals::domain::VerificationStatus;
use crate::marketplace::professionals::repository::ProfessionalRepository;

#[test]
fn search_filters_by_coverage_before_ranking() {
    let (service, profiles, _, _) = build_service();

    let mut nearby = profile("nearby", VerificationStatus::Verified, 400, 4.0);
    nearby.coverage = CoverageArea {
        base_zip: "94103".to_string(),
        service_radius_miles: 15,
        zip_codes: Vec::new(),
    };
    profiles.insert(nearby).expect("seed profile");

    let mut short_radius = profile("short-radius", VerificationStatus::Verified, 900, 5.0);
    short_radius.coverage.service_radius_miles = 10;
    profiles.insert(short_radius).expect("seed profile");

    let mut whitelisted = profile("whitelisted", VerificationStatus::Verified, 100, 3.5);
    whitelisted.coverage = CoverageArea {
        base_zip: String::new(),
        service_radius_miles: 0,
        zip_codes: vec!["94110".to_string()],
    };
    profiles.insert(whitelisted).expect("seed profile");

    let results = service.search("94110").expect("search succeeds");
    let ids: Vec<&str> = results
        .iter()
        .map(|profile| profile.professional_id.0.as_str())
        .collect();

    // The 10-mile crew cannot reach a county-prefix match; the whitelisted
    // crew can, regardless of its zero radius.
    assert_eq!(ids, vec!["nearby", "whitelisted"]);
}

#[test]
fn verified_status_dominates_tier_and_points() {
    let (service, profiles, _, _) = build_service();

    profiles
        .insert(profile("unverified-gold", VerificationStatus::Pending, 900, 5.0))
        .expect("seed profile");
    profiles
        .insert(profile("verified-bronze", VerificationStatus::Verified, 10, 2.0))
        .expect("seed profile");

    let results = service.search("94103").expect("search succeeds");
    assert_eq!(results[0].professional_id.0, "verified-bronze");
    assert_eq!(results[1].professional_id.0, "unverified-gold");
}

#[test]
fn search_ranking_is_stable_across_repeat_queries() {
    let (service, profiles, _, _) = build_service();

    for (id, points, rating) in [
        ("crew-a", 350, 4.0),
        ("crew-b", 350, 4.0),
        ("crew-c", 720, 3.0),
    ] {
        profiles
            .insert(profile(id, VerificationStatus::Verified, points, rating))
            .expect("seed profile");
    }

    let first = service.search("94103").expect("search succeeds");
    let second = service.search("94103").expect("search succeeds");
    assert_eq!(first, second);
    assert_eq!(first[0].professional_id.0, "crew-c");
}
