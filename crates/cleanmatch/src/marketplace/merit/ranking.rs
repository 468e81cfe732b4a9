use std::cmp::Ordering;

use crate::marketplace::professionals::domain::ProfessionalProfile;

/// Order search results by marketplace quality: verified professionals first,
/// then higher tier, then higher points, then higher rating. The sort is
/// stable, so ranking an already-ranked sequence is a no-op.
pub fn rank_by_merit(mut profiles: Vec<ProfessionalProfile>) -> Vec<ProfessionalProfile> {
    profiles.sort_by(merit_ordering);
    profiles
}

fn merit_ordering(a: &ProfessionalProfile, b: &ProfessionalProfile) -> Ordering {
    b.is_verified()
        .cmp(&a.is_verified())
        .then_with(|| b.level().cmp(&a.level()))
        .then_with(|| b.points.cmp(&a.points))
        .then_with(|| b.rating.total_cmp(&a.rating))
}
