use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::domain::{Lead, LeadId, LeadRequest, LeadStatus};
use super::repository::LeadRepository;
use crate::marketplace::coverage;
use crate::marketplace::merit::{self, LevelTransition};
use crate::marketplace::professionals::domain::{ProfessionalId, ProfessionalProfile};
use crate::marketplace::professionals::intake::is_well_formed_zip;
use crate::marketplace::professionals::repository::{
    MarketplaceNotice, NotificationPublisher, NotifyError, ProfessionalRepository, RepositoryError,
};

/// Merit awards tied to lead activity.
#[derive(Debug, Clone, Copy)]
pub struct MeritRewards {
    pub lead_accepted_points: i32,
}

impl Default for MeritRewards {
    fn default() -> Self {
        Self {
            lead_accepted_points: 10,
        }
    }
}

/// Service managing the lead lifecycle and the merit awards it triggers.
pub struct LeadService<L, P, N> {
    leads: Arc<L>,
    profiles: Arc<P>,
    notifier: Arc<N>,
    rewards: MeritRewards,
}

static LEAD_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_lead_id() -> LeadId {
    let id = LEAD_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    LeadId(format!("lead-{id:06}"))
}

/// Outcome of accepting a lead: the updated lead, the updated professional,
/// and the tier movement the award caused, if any.
#[derive(Debug, Clone)]
pub struct LeadAcceptance {
    pub lead: Lead,
    pub professional: ProfessionalProfile,
    pub transition: Option<LevelTransition>,
}

impl<L, P, N> LeadService<L, P, N>
where
    L: LeadRepository + 'static,
    P: ProfessionalRepository + 'static,
    N: NotificationPublisher + 'static,
{
    pub fn new(leads: Arc<L>, profiles: Arc<P>, notifier: Arc<N>, rewards: MeritRewards) -> Self {
        Self {
            leads,
            profiles,
            notifier,
            rewards,
        }
    }

    /// Record a client request. The coverage heuristic never validates ZIP
    /// format, so the check happens here at the boundary.
    pub fn submit(
        &self,
        mut request: LeadRequest,
        at: DateTime<Utc>,
    ) -> Result<Lead, LeadServiceError> {
        request.zip_code = request.zip_code.trim().to_string();
        if !is_well_formed_zip(&request.zip_code) {
            return Err(LeadServiceError::MalformedZip(request.zip_code));
        }

        let lead = Lead {
            lead_id: next_lead_id(),
            request,
            status: LeadStatus::Open,
            accepted_by: None,
            submitted_at: at,
        };
        let stored = self.leads.insert(lead)?;
        Ok(stored)
    }

    pub fn get(&self, id: &LeadId) -> Result<Lead, LeadServiceError> {
        let lead = self.leads.fetch(id)?.ok_or(RepositoryError::NotFound)?;
        Ok(lead)
    }

    /// The broadcast set for a lead: verified, actively subscribed, and
    /// covering the lead's ZIP, ranked by merit.
    pub fn eligible_professionals(
        &self,
        id: &LeadId,
    ) -> Result<Vec<ProfessionalProfile>, LeadServiceError> {
        let lead = self.get(id)?;
        let eligible = self
            .profiles
            .list()?
            .into_iter()
            .filter(|profile| {
                profile.is_verified()
                    && profile.has_active_subscription()
                    && coverage::can_serve(&profile.coverage, &lead.request.zip_code)
            })
            .collect();
        Ok(merit::rank_by_merit(eligible))
    }

    /// Claim an open lead. The accepting professional earns the configured
    /// merit award; a resulting tier change goes out as its own notice.
    pub fn accept(
        &self,
        id: &LeadId,
        professional_id: &ProfessionalId,
        at: DateTime<Utc>,
    ) -> Result<LeadAcceptance, LeadServiceError> {
        let mut lead = self.get(id)?;
        if lead.status != LeadStatus::Open {
            return Err(LeadServiceError::InvalidTransition {
                from: lead.status,
                to: LeadStatus::Accepted,
            });
        }

        let profile = self
            .profiles
            .fetch(professional_id)?
            .ok_or(RepositoryError::NotFound)?;

        lead.status = LeadStatus::Accepted;
        lead.accepted_by = Some(professional_id.clone());

        let adjustment = merit::apply_points(
            profile,
            self.rewards.lead_accepted_points,
            "lead accepted",
            None,
            at,
        );

        self.profiles.update(adjustment.profile.clone())?;
        self.leads.update(lead.clone())?;

        let mut details = BTreeMap::new();
        details.insert("lead_id".to_string(), lead.lead_id.0.clone());
        details.insert("zip_code".to_string(), lead.request.zip_code.clone());
        self.notifier.publish(MarketplaceNotice {
            template: "lead_accepted".to_string(),
            professional_id: professional_id.clone(),
            details,
        })?;

        if let Some(transition) = adjustment.transition {
            self.notifier.publish(MarketplaceNotice::level_change(
                professional_id.clone(),
                transition,
            ))?;
        }

        Ok(LeadAcceptance {
            lead,
            professional: adjustment.profile,
            transition: adjustment.transition,
        })
    }

    /// Close out an accepted lead. Only the professional who claimed it may
    /// complete it.
    pub fn complete(
        &self,
        id: &LeadId,
        professional_id: &ProfessionalId,
    ) -> Result<Lead, LeadServiceError> {
        let mut lead = self.get(id)?;
        if lead.status != LeadStatus::Accepted {
            return Err(LeadServiceError::InvalidTransition {
                from: lead.status,
                to: LeadStatus::Completed,
            });
        }
        if lead.accepted_by.as_ref() != Some(professional_id) {
            return Err(LeadServiceError::NotAssignee);
        }

        lead.status = LeadStatus::Completed;
        self.leads.update(lead.clone())?;
        Ok(lead)
    }
}

/// Error raised by the lead service.
#[derive(Debug, thiserror::Error)]
pub enum LeadServiceError {
    #[error("ZIP code '{0}' must be exactly five digits")]
    MalformedZip(String),
    #[error("lead cannot move from {from:?} to {to:?}")]
    InvalidTransition { from: LeadStatus, to: LeadStatus },
    #[error("lead was accepted by a different professional")]
    NotAssignee,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Notify(#[from] NotifyError),
}
