use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// How a discount modifies the base rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountTerms {
    /// Percentage off the base rate. Values of 100 or more floor the price
    /// at zero.
    Percentage(u32),
    /// Fixed amount off, in cents. Larger than the base rate floors at zero.
    FixedAmount(u32),
    /// The cycle bills nothing at all.
    FullExemption,
}

/// A time-bounded price modifier granted by the administrator.
///
/// Expiry is evaluated lazily wherever the discount is read; nothing sweeps
/// expired discounts in the background.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discount {
    pub terms: DiscountTerms,
    pub description: String,
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
}

impl Discount {
    /// Active only while `starts_on <= date <= ends_on`, both inclusive.
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        self.starts_on <= date && date <= self.ends_on
    }

    pub fn expired_by(&self, date: NaiveDate) -> bool {
        date > self.ends_on
    }
}
