//! Merit engine: pure tier derivation plus the single entry point through
//! which point totals may change.

mod ranking;
mod tiers;

pub use ranking::rank_by_merit;
pub use tiers::{
    level_for_points, next_level_threshold, MeritLevel, GOLD_THRESHOLD, SILVER_THRESHOLD,
};

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::marketplace::professionals::domain::{
    CampaignId, PointTransaction, ProfessionalProfile,
};

static TRANSACTION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_transaction_id() -> String {
    let id = TRANSACTION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("txn-{id:06}")
}

/// Tier movement caused by a point adjustment. Emitting the matching
/// upgrade/downgrade notification is the caller's job, not the engine's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelTransition {
    pub from: MeritLevel,
    pub to: MeritLevel,
}

impl LevelTransition {
    pub fn is_upgrade(&self) -> bool {
        self.to > self.from
    }

    pub fn direction_label(&self) -> &'static str {
        if self.is_upgrade() {
            "upgrade"
        } else {
            "downgrade"
        }
    }
}

/// Result of applying a point delta: the updated profile, the transaction
/// that recorded it, and the tier movement if any.
#[derive(Debug, Clone)]
pub struct PointAdjustment {
    pub profile: ProfessionalProfile,
    pub transaction: PointTransaction,
    pub transition: Option<LevelTransition>,
}

/// Apply a signed point delta to a profile.
///
/// The total floors at zero (penalties can empty an account, never overdraw
/// it) and the tier is re-derived from the new total on every call, so
/// upgrades and downgrades both fall out of the same computation. The
/// transaction is prepended to the history, newest first.
pub fn apply_points(
    mut profile: ProfessionalProfile,
    amount: i32,
    reason: &str,
    campaign_id: Option<CampaignId>,
    at: DateTime<Utc>,
) -> PointAdjustment {
    let before = profile.level();

    let adjusted = i64::from(profile.points) + i64::from(amount);
    profile.points = adjusted.clamp(0, i64::from(u32::MAX)) as u32;

    let transaction = PointTransaction {
        id: next_transaction_id(),
        amount,
        reason: reason.to_string(),
        recorded_at: at,
        campaign_id,
    };
    profile.point_history.insert(0, transaction.clone());

    let after = profile.level();
    let transition = (before != after).then_some(LevelTransition {
        from: before,
        to: after,
    });

    PointAdjustment {
        profile,
        transaction,
        transition,
    }
}
