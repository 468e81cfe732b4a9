use serde::{Deserialize, Serialize};

/// Cumulative points at which a professional enters the Silver tier.
pub const SILVER_THRESHOLD: u32 = 300;
/// Cumulative points at which a professional enters the Gold tier.
pub const GOLD_THRESHOLD: u32 = 700;

/// Marketplace tier derived from a professional's cumulative point total.
///
/// Declaration order doubles as ranking order: `Gold > Silver > Bronze`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MeritLevel {
    Bronze,
    Silver,
    Gold,
}

impl MeritLevel {
    pub const fn label(self) -> &'static str {
        match self {
            MeritLevel::Bronze => "bronze",
            MeritLevel::Silver => "silver",
            MeritLevel::Gold => "gold",
        }
    }
}

/// Pure, total tier lookup. Boundary totals belong to the upper tier
/// (300 is Silver, 700 is Gold).
pub fn level_for_points(points: u32) -> MeritLevel {
    if points >= GOLD_THRESHOLD {
        MeritLevel::Gold
    } else if points >= SILVER_THRESHOLD {
        MeritLevel::Silver
    } else {
        MeritLevel::Bronze
    }
}

/// Point total needed to reach the next tier, or `None` at the top. Feeds the
/// progress indicator only; ranking never consults it.
pub fn next_level_threshold(level: MeritLevel) -> Option<u32> {
    match level {
        MeritLevel::Bronze => Some(SILVER_THRESHOLD),
        MeritLevel::Silver => Some(GOLD_THRESHOLD),
        MeritLevel::Gold => None,
    }
}
