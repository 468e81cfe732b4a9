//! End-to-end roster onboarding: parse a CSV export, register the entries,
//! and confirm they surface in coverage search.

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::{Arc, Mutex};

use cleanmatch::marketplace::professionals::{
    BonusCampaign, CampaignId, CampaignRepository, MarketplaceNotice, NotificationPublisher,
    NotifyError, ProfessionalId, ProfessionalProfile, ProfessionalRepository, ProfessionalService,
    RepositoryError, VerificationStatus,
};
use cleanmatch::marketplace::roster::{RosterImportError, RosterImporter};

#[derive(Default, Clone)]
struct MemoryProfiles {
    records: Arc<Mutex<HashMap<ProfessionalId, ProfessionalProfile>>>,
}

impl ProfessionalRepository for MemoryProfiles {
    fn insert(&self, profile: ProfessionalProfile) -> Result<ProfessionalProfile, RepositoryError> {
        let mut guard = self.records.lock().expect("lock");
        guard.insert(profile.professional_id.clone(), profile.clone());
        Ok(profile)
    }

    fn update(&self, profile: ProfessionalProfile) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("lock");
        guard.insert(profile.professional_id.clone(), profile);
        Ok(())
    }

    fn fetch(&self, id: &ProfessionalId) -> Result<Option<ProfessionalProfile>, RepositoryError> {
        let guard = self.records.lock().expect("lock");
        Ok(guard.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<ProfessionalProfile>, RepositoryError> {
        let guard = self.records.lock().expect("lock");
        Ok(guard.values().cloned().collect())
    }
}

#[derive(Default, Clone)]
struct MemoryCampaigns;

impl CampaignRepository for MemoryCampaigns {
    fn insert(&self, campaign: BonusCampaign) -> Result<BonusCampaign, RepositoryError> {
        Ok(campaign)
    }

    fn update(&self, _campaign: BonusCampaign) -> Result<(), RepositoryError> {
        Ok(())
    }

    fn fetch(&self, _id: &CampaignId) -> Result<Option<BonusCampaign>, RepositoryError> {
        Ok(None)
    }
}

#[derive(Default, Clone)]
struct NullNotifier;

impl NotificationPublisher for NullNotifier {
    fn publish(&self, _notice: MarketplaceNotice) -> Result<(), NotifyError> {
        Ok(())
    }
}

const EXPORT: &str = "\
Name,Email,Phone,Base Zip,Radius Miles,Extra Zips,Rating
Mesa Verde Cleaning,crew@mesaverde.example,555-0100,94103,15,94110;94114,4.6
Harbor Shine,ops@harborshine.example,,02134,25,,4.1
,missing@example.com,,94103,10,,
Bare Row Cleaning,bare@example.com,,,10,,
Whitelist Only,list@example.com,555-0101,,0,10001-2345;10002,3.8
";

#[test]
fn export_rows_become_registered_professionals() {
    let import = RosterImporter::from_reader(Cursor::new(EXPORT)).expect("import succeeds");
    assert_eq!(import.entries.len(), 3);
    assert_eq!(import.skipped_rows, 2);

    let service = ProfessionalService::new(
        Arc::new(MemoryProfiles::default()),
        Arc::new(MemoryCampaigns),
        Arc::new(NullNotifier),
    );

    for entry in &import.entries {
        let stored = service
            .register(entry.submission.clone())
            .expect("imported row registers cleanly");
        service
            .moderate(&stored.professional_id, VerificationStatus::Verified)
            .expect("moderation succeeds");
        if let Some(rating) = entry.rating {
            service
                .set_rating(&stored.professional_id, rating)
                .expect("rating stored");
        }
    }

    // ZIP+4 whitelist entries were normalized at parse time, so the
    // list-only crew matches its whitelisted ZIP.
    let matches = service.search("10001").expect("search succeeds");
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].full_name, "Whitelist Only");
    assert!((matches[0].rating - 3.8).abs() < f32::EPSILON);

    let bay_area = service.search("94110").expect("search succeeds");
    assert_eq!(bay_area.len(), 1);
    assert_eq!(bay_area[0].full_name, "Mesa Verde Cleaning");
}

#[test]
fn truncated_exports_surface_csv_errors() {
    let broken = "Name,Email,Phone,Base Zip,Radius Miles,Extra Zips,Rating\n\"Unterminated,x@example.com\n";
    let error = RosterImporter::from_reader(Cursor::new(broken)).expect_err("csv error expected");
    assert!(matches!(error, RosterImportError::Csv(_)));
}
