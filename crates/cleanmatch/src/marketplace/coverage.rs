//! ZIP-prefix coverage matching.
//!
//! There is no geocoding service behind the marketplace. Shared ZIP prefixes
//! stand in for distance: the first three digits approximate a county, and
//! the two-digit region codes approximate a state region, with neighboring
//! codes (94/95) counted as the same region. The 15/25-mile radius gates
//! below are part of the product's observable matching behavior; swapping
//! in a real geodistance lookup would change which professionals surface in
//! searches and needs an explicit product decision first.

use serde::{Deserialize, Serialize};

/// Declared service area: a home-base ZIP with a radius, plus manually
/// whitelisted ZIP codes that bypass the radius heuristic entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageArea {
    pub base_zip: String,
    pub service_radius_miles: u32,
    pub zip_codes: Vec<String>,
}

/// Minimum declared radius for a county-level (3-digit prefix) match.
pub const COUNTY_MATCH_MIN_RADIUS_MILES: u32 = 15;
/// Minimum declared radius for a state-region (2-digit prefix) match.
pub const REGION_MATCH_MIN_RADIUS_MILES: u32 = 25;

/// Prefix-based range check. Both ZIPs are truncated to five characters
/// before comparison; no format validation happens here, so malformed input
/// degrades to a boolean rather than an error. Callers validate upstream.
pub fn is_zip_in_range(target_zip: &str, base_zip: &str, radius_miles: u32) -> bool {
    let target = zip_prefix(target_zip, 5);
    let base = zip_prefix(base_zip, 5);

    if target == base {
        return true;
    }

    if zip_prefix(target, 3) == zip_prefix(base, 3) {
        return radius_miles >= COUNTY_MATCH_MIN_RADIUS_MILES;
    }

    if region_codes_touch(target, base) {
        return radius_miles >= REGION_MATCH_MIN_RADIUS_MILES;
    }

    false
}

/// Whether a professional's declared coverage includes the target ZIP.
/// Explicit whitelist entries always win, independent of the radius.
pub fn can_serve(coverage: &CoverageArea, target_zip: &str) -> bool {
    let target = zip_prefix(target_zip, 5);

    if coverage
        .zip_codes
        .iter()
        .any(|zip| zip_prefix(zip, 5) == target)
    {
        return true;
    }

    !coverage.base_zip.is_empty()
        && is_zip_in_range(target, &coverage.base_zip, coverage.service_radius_miles)
}

/// The state-region tier: two-digit prefixes at most one code apart count as
/// the same region (94103 and 95000 are both reachable from the Bay Area).
/// Non-numeric prefixes fall back to literal equality.
fn region_codes_touch(target: &str, base: &str) -> bool {
    let target = zip_prefix(target, 2);
    let base = zip_prefix(base, 2);

    match (target.parse::<i32>(), base.parse::<i32>()) {
        (Ok(target_code), Ok(base_code)) => (target_code - base_code).abs() <= 1,
        _ => target == base,
    }
}

fn zip_prefix(zip: &str, len: usize) -> &str {
    match zip.char_indices().nth(len) {
        Some((index, _)) => &zip[..index],
        None => zip,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coverage(base_zip: &str, radius: u32, zips: &[&str]) -> CoverageArea {
        CoverageArea {
            base_zip: base_zip.to_string(),
            service_radius_miles: radius,
            zip_codes: zips.iter().map(|zip| zip.to_string()).collect(),
        }
    }

    #[test]
    fn exact_match_ignores_radius() {
        assert!(is_zip_in_range("94103", "94103", 5));
        assert!(is_zip_in_range("94103", "94103", 0));
    }

    #[test]
    fn county_prefix_requires_fifteen_miles() {
        assert!(is_zip_in_range("94110", "94103", 15));
        assert!(!is_zip_in_range("94110", "94103", 10));
    }

    #[test]
    fn region_tier_requires_twenty_five_miles() {
        assert!(is_zip_in_range("95000", "94103", 25));
        assert!(!is_zip_in_range("95000", "94103", 24));
        assert!(is_zip_in_range("94500", "94103", 25));
    }

    #[test]
    fn distant_region_codes_never_match() {
        assert!(!is_zip_in_range("10001", "94103", 25));
        assert!(!is_zip_in_range("10001", "94103", 100));
        assert!(!is_zip_in_range("96800", "94103", 25));
    }

    #[test]
    fn long_inputs_are_truncated_to_five_characters() {
        assert!(is_zip_in_range("94103-1234", "94103", 0));
        assert!(is_zip_in_range("94110-0000", "94103-9999", 15));
    }

    #[test]
    fn malformed_input_degrades_to_a_boolean() {
        assert!(!is_zip_in_range("abcde", "94103", 100));
        assert!(is_zip_in_range("abcde", "abcde", 0));
        assert!(is_zip_in_range("ab123", "ab999", 25));
    }

    #[test]
    fn whitelist_overrides_radius() {
        let area = coverage("", 10, &["10001"]);
        assert!(can_serve(&area, "10001"));
        assert!(!can_serve(&area, "10002"));
    }

    #[test]
    fn empty_base_without_whitelist_serves_nothing() {
        let area = coverage("", 100, &[]);
        assert!(!can_serve(&area, "94103"));
    }

    #[test]
    fn base_radius_applies_when_not_whitelisted() {
        let area = coverage("94103", 15, &["10001"]);
        assert!(can_serve(&area, "94110"));
        assert!(can_serve(&area, "10001"));
        assert!(!can_serve(&area, "95000"));
    }
}
