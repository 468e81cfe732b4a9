//! Subscription plans, discounts, and the simulated billing cycle.

mod discount;
mod payment;
mod plan;
mod pricing;

pub use discount::{Discount, DiscountTerms};
pub use payment::{process_payment, BillingRecord, BillingStatus, PaymentMethod, Subscription};
pub use plan::{SubscriptionPlan, PROMO_ROLLOVER_DAYS};
pub use pricing::{price_for, refresh_subscription_state};
