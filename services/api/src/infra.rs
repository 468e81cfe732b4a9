use chrono::NaiveDate;
use cleanmatch::marketplace::leads::{Lead, LeadId, LeadRepository, LeadStatus};
use cleanmatch::marketplace::professionals::{
    BonusCampaign, CampaignId, CampaignRepository, MarketplaceNotice, NotificationPublisher,
    NotifyError, ProfessionalId, ProfessionalProfile, ProfessionalRepository, RepositoryError,
};
use cleanmatch::marketplace::support::{SupportTicket, TicketId, TicketRepository, TicketStatus};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryProfessionalRepository {
    records: Arc<Mutex<HashMap<ProfessionalId, ProfessionalProfile>>>,
}

impl ProfessionalRepository for InMemoryProfessionalRepository {
    fn insert(&self, profile: ProfessionalProfile) -> Result<ProfessionalProfile, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&profile.professional_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(profile.professional_id.clone(), profile.clone());
        Ok(profile)
    }

    fn update(&self, profile: ProfessionalProfile) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&profile.professional_id) {
            guard.insert(profile.professional_id.clone(), profile);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &ProfessionalId) -> Result<Option<ProfessionalProfile>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<ProfessionalProfile>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryCampaignRepository {
    records: Arc<Mutex<HashMap<CampaignId, BonusCampaign>>>,
}

impl CampaignRepository for InMemoryCampaignRepository {
    fn insert(&self, campaign: BonusCampaign) -> Result<BonusCampaign, RepositoryError> {
        let mut guard = self.records.lock().expect("campaign mutex poisoned");
        if guard.contains_key(&campaign.campaign_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(campaign.campaign_id.clone(), campaign.clone());
        Ok(campaign)
    }

    fn update(&self, campaign: BonusCampaign) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("campaign mutex poisoned");
        if guard.contains_key(&campaign.campaign_id) {
            guard.insert(campaign.campaign_id.clone(), campaign);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &CampaignId) -> Result<Option<BonusCampaign>, RepositoryError> {
        let guard = self.records.lock().expect("campaign mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryLeadRepository {
    records: Arc<Mutex<HashMap<LeadId, Lead>>>,
}

impl LeadRepository for InMemoryLeadRepository {
    fn insert(&self, lead: Lead) -> Result<Lead, RepositoryError> {
        let mut guard = self.records.lock().expect("lead mutex poisoned");
        if guard.contains_key(&lead.lead_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(lead.lead_id.clone(), lead.clone());
        Ok(lead)
    }

    fn update(&self, lead: Lead) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("lead mutex poisoned");
        if guard.contains_key(&lead.lead_id) {
            guard.insert(lead.lead_id.clone(), lead);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &LeadId) -> Result<Option<Lead>, RepositoryError> {
        let guard = self.records.lock().expect("lead mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn open(&self) -> Result<Vec<Lead>, RepositoryError> {
        let guard = self.records.lock().expect("lead mutex poisoned");
        Ok(guard
            .values()
            .filter(|lead| lead.status == LeadStatus::Open)
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryTicketRepository {
    records: Arc<Mutex<HashMap<TicketId, SupportTicket>>>,
}

impl TicketRepository for InMemoryTicketRepository {
    fn insert(&self, ticket: SupportTicket) -> Result<SupportTicket, RepositoryError> {
        let mut guard = self.records.lock().expect("ticket mutex poisoned");
        guard.insert(ticket.ticket_id.clone(), ticket.clone());
        Ok(ticket)
    }

    fn update(&self, ticket: SupportTicket) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("ticket mutex poisoned");
        if guard.contains_key(&ticket.ticket_id) {
            guard.insert(ticket.ticket_id.clone(), ticket);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &TicketId) -> Result<Option<SupportTicket>, RepositoryError> {
        let guard = self.records.lock().expect("ticket mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn open(&self) -> Result<Vec<SupportTicket>, RepositoryError> {
        let guard = self.records.lock().expect("ticket mutex poisoned");
        Ok(guard
            .values()
            .filter(|ticket| ticket.status == TicketStatus::Open)
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryNotifier {
    events: Arc<Mutex<Vec<MarketplaceNotice>>>,
}

impl NotificationPublisher for InMemoryNotifier {
    fn publish(&self, notice: MarketplaceNotice) -> Result<(), NotifyError> {
        let mut guard = self.events.lock().expect("notifier mutex poisoned");
        guard.push(notice);
        Ok(())
    }
}

impl InMemoryNotifier {
    pub(crate) fn events(&self) -> Vec<MarketplaceNotice> {
        self.events.lock().expect("notifier mutex poisoned").clone()
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn format_usd(cents: u32) -> String {
    format!("${}.{:02}", cents / 100, cents % 100)
}
