use serde::{Deserialize, Serialize};

/// Days a promotional subscription runs before rolling over to standard
/// pricing. The rollover is one-directional.
pub const PROMO_ROLLOVER_DAYS: i64 = 60;

/// The two price tiers professionals subscribe to for lead access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionPlan {
    PromoStartup,
    StandardPro,
}

impl SubscriptionPlan {
    /// Monthly rate in integer cents.
    pub const fn monthly_rate_cents(self) -> u32 {
        match self {
            SubscriptionPlan::PromoStartup => 18_000,
            SubscriptionPlan::StandardPro => 26_000,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            SubscriptionPlan::PromoStartup => "promo_startup",
            SubscriptionPlan::StandardPro => "standard_pro",
        }
    }
}
