use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{BonusCampaign, CampaignId, ProfessionalId, ProfessionalProfile};
use crate::marketplace::merit::LevelTransition;

/// Storage abstraction so the service layer can be exercised in isolation.
pub trait ProfessionalRepository: Send + Sync {
    fn insert(&self, profile: ProfessionalProfile)
        -> Result<ProfessionalProfile, RepositoryError>;
    fn update(&self, profile: ProfessionalProfile) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &ProfessionalId) -> Result<Option<ProfessionalProfile>, RepositoryError>;
    fn list(&self) -> Result<Vec<ProfessionalProfile>, RepositoryError>;
}

/// Campaign templates live behind their own store so the admin surface can be
/// tested without touching profiles.
pub trait CampaignRepository: Send + Sync {
    fn insert(&self, campaign: BonusCampaign) -> Result<BonusCampaign, RepositoryError>;
    fn update(&self, campaign: BonusCampaign) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &CampaignId) -> Result<Option<BonusCampaign>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Trait describing outbound notification hooks (e-mail or push adapters).
pub trait NotificationPublisher: Send + Sync {
    fn publish(&self, notice: MarketplaceNotice) -> Result<(), NotifyError>;
}

/// Notification payload so routes/tests can assert integration boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketplaceNotice {
    pub template: String,
    pub professional_id: ProfessionalId,
    pub details: BTreeMap<String, String>,
}

impl MarketplaceNotice {
    /// Upgrade/downgrade notice for a tier movement. Both the admin
    /// adjustment path and the lead-acceptance path emit this.
    pub fn level_change(professional_id: ProfessionalId, transition: LevelTransition) -> Self {
        let template = if transition.is_upgrade() {
            "merit_level_upgraded"
        } else {
            "merit_level_downgraded"
        };

        let mut details = BTreeMap::new();
        details.insert("from".to_string(), transition.from.label().to_string());
        details.insert("to".to_string(), transition.to.label().to_string());

        Self {
            template: template.to_string(),
            professional_id,
            details,
        }
    }
}

/// Notification dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}

/// Sanitized representation of a professional for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct ProfessionalView {
    pub professional_id: ProfessionalId,
    pub full_name: String,
    pub verification: &'static str,
    pub level: &'static str,
    pub points: u32,
    pub rating: f32,
    pub base_zip: String,
    pub service_radius_miles: u32,
    pub subscription_active: bool,
}

impl ProfessionalView {
    pub fn from_profile(profile: &ProfessionalProfile) -> Self {
        Self {
            professional_id: profile.professional_id.clone(),
            full_name: profile.full_name.clone(),
            verification: profile.verification.label(),
            level: profile.level().label(),
            points: profile.points,
            rating: profile.rating,
            base_zip: profile.coverage.base_zip.clone(),
            service_radius_miles: profile.coverage.service_radius_miles,
            subscription_active: profile.has_active_subscription(),
        }
    }
}
