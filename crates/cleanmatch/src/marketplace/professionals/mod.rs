//! Professional registration, moderation, merit adjustments, campaigns, and
//! subscription billing.

pub(crate) mod intake;

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    BonusCampaign, CampaignDraft, CampaignId, CampaignKind, PointTransaction, ProfessionalId,
    ProfessionalProfile, RegistrationSubmission, VerificationStatus,
};
pub use intake::{IntakeGuard, RegistrationViolation};
pub use repository::{
    CampaignRepository, MarketplaceNotice, NotificationPublisher, NotifyError,
    ProfessionalRepository, ProfessionalView, RepositoryError,
};
pub use router::professional_router;
pub use service::{ProfessionalService, ProfessionalServiceError};
