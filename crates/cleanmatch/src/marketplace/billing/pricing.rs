use chrono::NaiveDate;

use super::discount::{Discount, DiscountTerms};
use super::payment::Subscription;
use super::plan::{SubscriptionPlan, PROMO_ROLLOVER_DAYS};

/// Amount due for one billing cycle, in cents.
///
/// A discount outside its window is silently ignored, never an error; every
/// modifier floors the result at zero.
pub fn price_for(plan: SubscriptionPlan, discount: Option<&Discount>, today: NaiveDate) -> u32 {
    let base = plan.monthly_rate_cents();

    let discount = match discount {
        Some(discount) if discount.is_active_on(today) => discount,
        _ => return base,
    };

    match &discount.terms {
        DiscountTerms::FullExemption => 0,
        DiscountTerms::FixedAmount(cents) => base.saturating_sub(*cents),
        DiscountTerms::Percentage(percent) => {
            if *percent >= 100 {
                0
            } else {
                base - base * percent / 100
            }
        }
    }
}

/// Read-time maintenance for a subscription record. Idempotent; the service
/// layer calls it whenever a subscription is loaded, there is no background
/// sweep.
///
/// A promotional plan older than sixty days rolls over to standard pricing
/// (never the other way around), and a discount past its end date is cleared.
pub fn refresh_subscription_state(mut subscription: Subscription, today: NaiveDate) -> Subscription {
    let promo_age_days = (today - subscription.started_on).num_days();
    if subscription.plan == SubscriptionPlan::PromoStartup && promo_age_days > PROMO_ROLLOVER_DAYS {
        subscription.plan = SubscriptionPlan::StandardPro;
        subscription.last_payment_cents = SubscriptionPlan::StandardPro.monthly_rate_cents();
    }

    let discount_expired = subscription
        .active_discount
        .as_ref()
        .map_or(false, |discount| discount.expired_by(today));
    if discount_expired {
        subscription.active_discount = None;
    }

    subscription
}
