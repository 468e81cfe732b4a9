use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::marketplace::billing::Subscription;
use crate::marketplace::coverage::CoverageArea;
use crate::marketplace::merit::{level_for_points, MeritLevel};

/// Identifier wrapper for registered professionals.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProfessionalId(pub String);

/// Identifier wrapper for bonus campaigns.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CampaignId(pub String);

/// Moderation status assigned by the marketplace administrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerificationStatus {
    Pending,
    Verified,
    Rejected,
}

impl VerificationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            VerificationStatus::Pending => "pending",
            VerificationStatus::Verified => "verified",
            VerificationStatus::Rejected => "rejected",
        }
    }
}

/// Immutable record of a single merit adjustment. Created only by the merit
/// engine's adjustment entry point; never mutated or deleted afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointTransaction {
    pub id: String,
    pub amount: i32,
    pub reason: String,
    pub recorded_at: DateTime<Utc>,
    pub campaign_id: Option<CampaignId>,
}

/// Contact and coverage details captured at registration time, before the
/// intake guard has validated anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationSubmission {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub base_zip: String,
    pub service_radius_miles: u32,
    #[serde(default)]
    pub zip_codes: Vec<String>,
}

/// A cleaning professional as tracked by the marketplace.
///
/// The merit tier is never stored; `level()` re-derives it from `points` on
/// every read, so the two cannot drift apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfessionalProfile {
    pub professional_id: ProfessionalId,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub verification: VerificationStatus,
    pub points: u32,
    /// Newest first.
    pub point_history: Vec<PointTransaction>,
    /// Maintained by the review pipeline, consumed here only as a ranking
    /// tie-breaker.
    pub rating: f32,
    pub coverage: CoverageArea,
    pub subscription: Option<Subscription>,
}

impl ProfessionalProfile {
    pub fn level(&self) -> MeritLevel {
        level_for_points(self.points)
    }

    pub fn is_verified(&self) -> bool {
        matches!(self.verification, VerificationStatus::Verified)
    }

    pub fn has_active_subscription(&self) -> bool {
        self.subscription
            .as_ref()
            .map_or(false, |subscription| subscription.is_active)
    }
}

/// Loose classification for reporting on campaign spend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignKind {
    Onboarding,
    Seasonal,
    Quality,
    Referral,
}

impl CampaignKind {
    pub const fn label(self) -> &'static str {
        match self {
            CampaignKind::Onboarding => "onboarding",
            CampaignKind::Seasonal => "seasonal",
            CampaignKind::Quality => "quality",
            CampaignKind::Referral => "referral",
        }
    }
}

/// Fields an administrator supplies when creating a campaign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignDraft {
    pub title: String,
    pub description: String,
    pub points_reward: u32,
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
    pub kind: CampaignKind,
}

/// Admin-defined template for awarding bonus merit points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusCampaign {
    pub campaign_id: CampaignId,
    pub title: String,
    pub description: String,
    pub points_reward: u32,
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
    pub is_active: bool,
    pub kind: CampaignKind,
}

impl BonusCampaign {
    /// Whether awards may be made against this campaign today. Deactivating
    /// a campaign later never rewrites transactions already recorded.
    pub fn is_open_on(&self, date: NaiveDate) -> bool {
        self.is_active && self.starts_on <= date && date <= self.ends_on
    }
}
