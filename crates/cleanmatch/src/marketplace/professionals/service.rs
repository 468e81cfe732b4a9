use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};

use super::domain::{
    BonusCampaign, CampaignDraft, CampaignId, ProfessionalId, ProfessionalProfile,
    RegistrationSubmission, VerificationStatus,
};
use super::intake::{IntakeGuard, RegistrationViolation};
use super::repository::{
    CampaignRepository, MarketplaceNotice, NotificationPublisher, NotifyError,
    ProfessionalRepository, RepositoryError,
};
use crate::marketplace::billing::{
    self, Discount, PaymentMethod, Subscription,
};
use crate::marketplace::coverage;
use crate::marketplace::merit::{self, PointAdjustment};

/// Service composing the intake guard, profile store, merit engine, and
/// billing calculator.
pub struct ProfessionalService<P, C, N> {
    guard: IntakeGuard,
    profiles: Arc<P>,
    campaigns: Arc<C>,
    notifier: Arc<N>,
}

static PROFESSIONAL_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static CAMPAIGN_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_professional_id() -> ProfessionalId {
    let id = PROFESSIONAL_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ProfessionalId(format!("pro-{id:06}"))
}

fn next_campaign_id() -> CampaignId {
    let id = CAMPAIGN_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    CampaignId(format!("camp-{id:06}"))
}

impl<P, C, N> ProfessionalService<P, C, N>
where
    P: ProfessionalRepository + 'static,
    C: CampaignRepository + 'static,
    N: NotificationPublisher + 'static,
{
    pub fn new(profiles: Arc<P>, campaigns: Arc<C>, notifier: Arc<N>) -> Self {
        Self {
            guard: IntakeGuard::default(),
            profiles,
            campaigns,
            notifier,
        }
    }

    /// Register a new professional, returning the stored profile.
    pub fn register(
        &self,
        submission: RegistrationSubmission,
    ) -> Result<ProfessionalProfile, ProfessionalServiceError> {
        let mut profile = self.guard.profile_from_submission(submission)?;
        profile.professional_id = next_professional_id();
        let stored = self.profiles.insert(profile)?;
        Ok(stored)
    }

    pub fn get(
        &self,
        id: &ProfessionalId,
    ) -> Result<ProfessionalProfile, ProfessionalServiceError> {
        let profile = self.profiles.fetch(id)?.ok_or(RepositoryError::NotFound)?;
        Ok(profile)
    }

    /// Administrator moderation decision; notifies the professional.
    pub fn moderate(
        &self,
        id: &ProfessionalId,
        decision: VerificationStatus,
    ) -> Result<ProfessionalProfile, ProfessionalServiceError> {
        let mut profile = self.get(id)?;
        profile.verification = decision;
        self.profiles.update(profile.clone())?;

        let template = match decision {
            VerificationStatus::Verified => "professional_verified",
            VerificationStatus::Rejected => "professional_rejected",
            VerificationStatus::Pending => "professional_pending",
        };
        self.notifier.publish(MarketplaceNotice {
            template: template.to_string(),
            professional_id: profile.professional_id.clone(),
            details: BTreeMap::new(),
        })?;

        Ok(profile)
    }

    /// Overwrite the review-pipeline rating used as a ranking tie-breaker.
    pub fn set_rating(
        &self,
        id: &ProfessionalId,
        rating: f32,
    ) -> Result<ProfessionalProfile, ProfessionalServiceError> {
        let mut profile = self.get(id)?;
        profile.rating = rating.clamp(0.0, 5.0);
        self.profiles.update(profile.clone())?;
        Ok(profile)
    }

    /// Single mutation entry point for merit totals. The tier is re-derived
    /// inside the merit engine; when it moves, the matching
    /// upgrade/downgrade notice goes out from here.
    pub fn adjust_points(
        &self,
        id: &ProfessionalId,
        amount: i32,
        reason: &str,
        campaign_id: Option<CampaignId>,
        at: DateTime<Utc>,
    ) -> Result<PointAdjustment, ProfessionalServiceError> {
        let profile = self.get(id)?;
        let adjustment = merit::apply_points(profile, amount, reason, campaign_id, at);
        self.profiles.update(adjustment.profile.clone())?;

        if let Some(transition) = adjustment.transition {
            self.notifier.publish(MarketplaceNotice::level_change(
                adjustment.profile.professional_id.clone(),
                transition,
            ))?;
        }

        Ok(adjustment)
    }

    pub fn create_campaign(
        &self,
        draft: CampaignDraft,
    ) -> Result<BonusCampaign, ProfessionalServiceError> {
        let campaign = BonusCampaign {
            campaign_id: next_campaign_id(),
            title: draft.title,
            description: draft.description,
            points_reward: draft.points_reward,
            starts_on: draft.starts_on,
            ends_on: draft.ends_on,
            is_active: true,
            kind: draft.kind,
        };
        let stored = self.campaigns.insert(campaign)?;
        Ok(stored)
    }

    pub fn set_campaign_active(
        &self,
        id: &CampaignId,
        is_active: bool,
    ) -> Result<BonusCampaign, ProfessionalServiceError> {
        let mut campaign = self.campaigns.fetch(id)?.ok_or(RepositoryError::NotFound)?;
        campaign.is_active = is_active;
        self.campaigns.update(campaign.clone())?;
        Ok(campaign)
    }

    /// Award a campaign's point bounty to one professional. Refused outside
    /// the campaign's active window; past awards are never clawed back when
    /// a campaign is later deactivated.
    pub fn award_campaign(
        &self,
        campaign_id: &CampaignId,
        professional_id: &ProfessionalId,
        today: NaiveDate,
        at: DateTime<Utc>,
    ) -> Result<PointAdjustment, ProfessionalServiceError> {
        let campaign = self
            .campaigns
            .fetch(campaign_id)?
            .ok_or(RepositoryError::NotFound)?;

        if !campaign.is_open_on(today) {
            return Err(ProfessionalServiceError::CampaignClosed {
                campaign_id: campaign_id.clone(),
            });
        }

        let amount = i32::try_from(campaign.points_reward).unwrap_or(i32::MAX);
        self.adjust_points(
            professional_id,
            amount,
            &campaign.title,
            Some(campaign.campaign_id.clone()),
            at,
        )
    }

    /// Coverage-filtered, merit-ranked directory search. The ranking is the
    /// marketplace's implicit quality score, so it is computed here and
    /// nowhere else.
    pub fn search(
        &self,
        target_zip: &str,
    ) -> Result<Vec<ProfessionalProfile>, ProfessionalServiceError> {
        let matches = self
            .profiles
            .list()?
            .into_iter()
            .filter(|profile| coverage::can_serve(&profile.coverage, target_zip))
            .collect();
        Ok(merit::rank_by_merit(matches))
    }

    /// Settle one billing cycle through the simulated gateway and persist
    /// the resulting subscription.
    pub fn pay_subscription(
        &self,
        id: &ProfessionalId,
        method: PaymentMethod,
        force_amount_cents: Option<u32>,
        today: NaiveDate,
    ) -> Result<Subscription, ProfessionalServiceError> {
        let mut profile = self.get(id)?;
        let current = profile
            .subscription
            .take()
            .map(|subscription| billing::refresh_subscription_state(subscription, today));
        let subscription = billing::process_payment(current, method, force_amount_cents, today);
        profile.subscription = Some(subscription.clone());
        self.profiles.update(profile)?;

        let latest_status = subscription
            .billing_history
            .last()
            .map(|record| record.status.label())
            .unwrap_or("paid");
        let mut details = BTreeMap::new();
        details.insert(
            "amount_cents".to_string(),
            subscription.last_payment_cents.to_string(),
        );
        details.insert("status".to_string(), latest_status.to_string());
        self.notifier.publish(MarketplaceNotice {
            template: "subscription_payment".to_string(),
            professional_id: id.clone(),
            details,
        })?;

        Ok(subscription)
    }

    /// Attach a discount to an existing subscription (admin concession).
    pub fn grant_discount(
        &self,
        id: &ProfessionalId,
        discount: Discount,
    ) -> Result<Subscription, ProfessionalServiceError> {
        let mut profile = self.get(id)?;
        let mut subscription = profile
            .subscription
            .take()
            .ok_or(ProfessionalServiceError::NoSubscription)?;
        subscription.active_discount = Some(discount);
        profile.subscription = Some(subscription.clone());
        self.profiles.update(profile)?;
        Ok(subscription)
    }

    /// Read-time subscription view. Promo rollover and discount expiry are
    /// applied lazily here and persisted when anything changed.
    pub fn subscription_status(
        &self,
        id: &ProfessionalId,
        today: NaiveDate,
    ) -> Result<Option<Subscription>, ProfessionalServiceError> {
        let mut profile = self.get(id)?;
        let current = match profile.subscription.take() {
            Some(subscription) => subscription,
            None => return Ok(None),
        };

        let refreshed = billing::refresh_subscription_state(current.clone(), today);
        let changed = refreshed != current;
        profile.subscription = Some(refreshed.clone());
        if changed {
            self.profiles.update(profile)?;
        }

        Ok(Some(refreshed))
    }
}

/// Error raised by the professional service.
#[derive(Debug, thiserror::Error)]
pub enum ProfessionalServiceError {
    #[error(transparent)]
    Registration(#[from] RegistrationViolation),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Notify(#[from] NotifyError),
    #[error("campaign {campaign_id:?} is outside its active window")]
    CampaignClosed { campaign_id: CampaignId },
    #[error("professional has no subscription on file")]
    NoSubscription,
}
