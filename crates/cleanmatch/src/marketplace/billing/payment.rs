use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

use super::discount::Discount;
use super::plan::SubscriptionPlan;
use super::pricing::price_for;

/// Payment instrument on file. The simulated gateway accepts them all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    CreditCard,
    DebitCard,
    BankTransfer,
}

impl PaymentMethod {
    pub const fn label(self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "credit_card",
            PaymentMethod::DebitCard => "debit_card",
            PaymentMethod::BankTransfer => "bank_transfer",
        }
    }
}

/// Settlement status of one billing cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingStatus {
    Paid,
    Exempted,
}

impl BillingStatus {
    pub const fn label(self) -> &'static str {
        match self {
            BillingStatus::Paid => "paid",
            BillingStatus::Exempted => "exempted",
        }
    }
}

/// One entry in the append-only billing history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingRecord {
    pub recorded_on: NaiveDate,
    pub amount_cents: u32,
    pub method: PaymentMethod,
    pub status: BillingStatus,
}

/// A professional's lead-access subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub is_active: bool,
    pub plan: SubscriptionPlan,
    pub started_on: NaiveDate,
    pub next_billing_on: NaiveDate,
    pub payment_method: PaymentMethod,
    pub last_payment_cents: u32,
    pub active_discount: Option<Discount>,
    pub billing_history: Vec<BillingRecord>,
}

/// Settle one billing cycle against the simulated gateway.
///
/// The gateway never declines and never times out; failure modes of real
/// payment processing are not modeled here. First-time subscribers land on
/// the promotional plan. A forced amount (admin correction) bypasses the
/// price calculation but still lands in the history. A zero-cent cycle is
/// recorded as exempted rather than paid.
pub fn process_payment(
    current: Option<Subscription>,
    method: PaymentMethod,
    force_amount_cents: Option<u32>,
    today: NaiveDate,
) -> Subscription {
    let (plan, started_on, active_discount, mut billing_history) = match current {
        Some(subscription) => (
            subscription.plan,
            subscription.started_on,
            subscription.active_discount,
            subscription.billing_history,
        ),
        None => (SubscriptionPlan::PromoStartup, today, None, Vec::new()),
    };

    let active_discount = active_discount.filter(|discount| discount.is_active_on(today));
    let amount_cents =
        force_amount_cents.unwrap_or_else(|| price_for(plan, active_discount.as_ref(), today));

    let status = if amount_cents == 0 {
        BillingStatus::Exempted
    } else {
        BillingStatus::Paid
    };
    billing_history.push(BillingRecord {
        recorded_on: today,
        amount_cents,
        method,
        status,
    });

    Subscription {
        is_active: true,
        plan,
        started_on,
        next_billing_on: today + Months::new(1),
        payment_method: method,
        last_payment_cents: amount_cents,
        active_discount,
        billing_history,
    }
}
