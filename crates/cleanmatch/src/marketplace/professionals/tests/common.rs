use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;

use crate::marketplace::coverage::CoverageArea;
use crate::marketplace::professionals::domain::{
    BonusCampaign, CampaignDraft, CampaignId, CampaignKind, ProfessionalId, ProfessionalProfile,
    RegistrationSubmission, VerificationStatus,
};
use crate::marketplace::professionals::repository::{
    CampaignRepository, MarketplaceNotice, NotificationPublisher, NotifyError,
    ProfessionalRepository, RepositoryError,
};
use crate::marketplace::professionals::router::professional_router;
use crate::marketplace::professionals::service::ProfessionalService;

pub(super) const ADMIN_TOKEN: &str = "test-admin-token";

pub(super) fn submission() -> RegistrationSubmission {
    RegistrationSubmission {
        full_name: "Mesa Verde Cleaning".to_string(),
        email: "crew@mesaverde.example".to_string(),
        phone: "555-0100".to_string(),
        base_zip: "94103".to_string(),
        service_radius_miles: 15,
        zip_codes: vec!["10001".to_string()],
    }
}

pub(super) fn profile(
    id: &str,
    verification: VerificationStatus,
    points: u32,
    rating: f32,
) -> ProfessionalProfile {
    ProfessionalProfile {
        professional_id: ProfessionalId(id.to_string()),
        full_name: format!("Crew {id}"),
        email: format!("{id}@example.com"),
        phone: "555-0199".to_string(),
        verification,
        points,
        point_history: Vec::new(),
        rating,
        coverage: CoverageArea {
            base_zip: "94103".to_string(),
            service_radius_miles: 15,
            zip_codes: Vec::new(),
        },
        subscription: None,
    }
}

pub(super) fn campaign(id: &str, points_reward: u32, is_active: bool) -> BonusCampaign {
    BonusCampaign {
        campaign_id: CampaignId(id.to_string()),
        title: "Spring onboarding bonus".to_string(),
        description: "Bonus for completing onboarding during the spring push".to_string(),
        points_reward,
        starts_on: date(2026, 3, 1),
        ends_on: date(2026, 5, 31),
        is_active,
        kind: CampaignKind::Onboarding,
    }
}

pub(super) fn campaign_draft() -> CampaignDraft {
    CampaignDraft {
        title: "Referral drive".to_string(),
        description: "Points for referred professionals who complete a lead".to_string(),
        points_reward: 50,
        starts_on: date(2026, 3, 1),
        ends_on: date(2026, 6, 30),
        kind: CampaignKind::Referral,
    }
}

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn timestamp() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2026-04-18T10:30:00Z")
        .expect("valid timestamp")
        .with_timezone(&Utc)
}

pub(super) fn build_service() -> (
    ProfessionalService<MemoryProfiles, MemoryCampaigns, MemoryNotifier>,
    Arc<MemoryProfiles>,
    Arc<MemoryCampaigns>,
    Arc<MemoryNotifier>,
) {
    let profiles = Arc::new(MemoryProfiles::default());
    let campaigns = Arc::new(MemoryCampaigns::default());
    let notifier = Arc::new(MemoryNotifier::default());
    let service = ProfessionalService::new(profiles.clone(), campaigns.clone(), notifier.clone());
    (service, profiles, campaigns, notifier)
}

pub(super) fn router_with_service(
    service: ProfessionalService<MemoryProfiles, MemoryCampaigns, MemoryNotifier>,
) -> axum::Router {
    professional_router(Arc::new(service), ADMIN_TOKEN)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

#[derive(Default, Clone)]
pub(super) struct MemoryProfiles {
    records: Arc<Mutex<HashMap<ProfessionalId, ProfessionalProfile>>>,
}

impl ProfessionalRepository for MemoryProfiles {
    fn insert(
        &self,
        profile: ProfessionalProfile,
    ) -> Result<ProfessionalProfile, RepositoryError> {
        let mut guard = self.records.lock().expect("profile mutex poisoned");
        if guard.contains_key(&profile.professional_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(profile.professional_id.clone(), profile.clone());
        Ok(profile)
    }

    fn update(&self, profile: ProfessionalProfile) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("profile mutex poisoned");
        guard.insert(profile.professional_id.clone(), profile);
        Ok(())
    }

    fn fetch(&self, id: &ProfessionalId) -> Result<Option<ProfessionalProfile>, RepositoryError> {
        let guard = self.records.lock().expect("profile mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<ProfessionalProfile>, RepositoryError> {
        let guard = self.records.lock().expect("profile mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryCampaigns {
    records: Arc<Mutex<HashMap<CampaignId, BonusCampaign>>>,
}

impl CampaignRepository for MemoryCampaigns {
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
        guard.insert(campaign.campaign_id.clone(), campaign);
        Ok(())
    }

    fn fetch(&self, id: &CampaignId) -> Result<Option<BonusCampaign>, RepositoryError> {
        let guard = self.records.lock().expect("campaign mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryNotifier {
    notices: Arc<Mutex<Vec<MarketplaceNotice>>>,
}

impl MemoryNotifier {
    pub(super) fn notices(&self) -> Vec<MarketplaceNotice> {
        self.notices.lock().expect("notice mutex poisoned").clone()
    }

    pub(super) fn templates(&self) -> Vec<String> {
        self.notices()
            .into_iter()
            .map(|notice| notice.template)
            .collect()
    }
}

impl NotificationPublisher for MemoryNotifier {
    fn publish(&self, notice: MarketplaceNotice) -> Result<(), NotifyError> {
        self.notices
            .lock()
            .expect("notice mutex poisoned")
            .push(notice);
        Ok(())
    }
}

pub(super) struct UnavailableProfiles;

impl ProfessionalRepository for UnavailableProfiles {
    fn insert(
        &self,
        _profile: ProfessionalProfile,
    ) -> Result<ProfessionalProfile, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _profile: ProfessionalProfile) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(
        &self,
        _id: &ProfessionalId,
    ) -> Result<Option<ProfessionalProfile>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self) -> Result<Vec<ProfessionalProfile>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}
