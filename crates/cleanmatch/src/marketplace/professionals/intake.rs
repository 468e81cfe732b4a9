use super::domain::{
    ProfessionalId, ProfessionalProfile, RegistrationSubmission, VerificationStatus,
};
use crate::marketplace::coverage::CoverageArea;

/// Validation errors raised by the registration intake guard.
#[derive(Debug, thiserror::Error)]
pub enum RegistrationViolation {
    #[error("professional name is required")]
    MissingName,
    #[error("at least one contact channel (email or phone) is required")]
    MissingContact,
    #[error("ZIP code '{0}' must be exactly five digits")]
    MalformedZip(String),
    #[error("a base ZIP or at least one explicit ZIP code is required")]
    MissingCoverage,
    #[error("service radius {found} exceeds the supported maximum of {max} miles")]
    ExcessiveRadius { max: u32, found: u32 },
}

const MAX_SERVICE_RADIUS_MILES: u32 = 100;

/// Guard producing `ProfessionalProfile` records from raw submissions.
///
/// The coverage heuristic truncates ZIPs without validating them, so format
/// checks happen here, before a submission can reach the matching layer.
#[derive(Debug, Clone, Default)]
pub struct IntakeGuard;

impl IntakeGuard {
    pub fn profile_from_submission(
        &self,
        submission: RegistrationSubmission,
    ) -> Result<ProfessionalProfile, RegistrationViolation> {
        let full_name = submission.full_name.trim().to_string();
        if full_name.is_empty() {
            return Err(RegistrationViolation::MissingName);
        }

        let email = submission.email.trim().to_string();
        let phone = submission.phone.trim().to_string();
        if email.is_empty() && phone.is_empty() {
            return Err(RegistrationViolation::MissingContact);
        }

        let base_zip = submission.base_zip.trim().to_string();
        if !base_zip.is_empty() && !is_well_formed_zip(&base_zip) {
            return Err(RegistrationViolation::MalformedZip(base_zip));
        }

        let mut zip_codes: Vec<String> = Vec::with_capacity(submission.zip_codes.len());
        for zip in submission.zip_codes {
            let zip = zip.trim().to_string();
            if zip.is_empty() {
                continue;
            }
            if !is_well_formed_zip(&zip) {
                return Err(RegistrationViolation::MalformedZip(zip));
            }
            if !zip_codes.contains(&zip) {
                zip_codes.push(zip);
            }
        }

        if base_zip.is_empty() && zip_codes.is_empty() {
            return Err(RegistrationViolation::MissingCoverage);
        }

        if submission.service_radius_miles > MAX_SERVICE_RADIUS_MILES {
            return Err(RegistrationViolation::ExcessiveRadius {
                max: MAX_SERVICE_RADIUS_MILES,
                found: submission.service_radius_miles,
            });
        }

        Ok(ProfessionalProfile {
            professional_id: ProfessionalId("pending".to_string()),
            full_name,
            email,
            phone,
            verification: VerificationStatus::Pending,
            points: 0,
            point_history: Vec::new(),
            rating: 0.0,
            coverage: CoverageArea {
                base_zip,
                service_radius_miles: submission.service_radius_miles,
                zip_codes,
            },
            subscription: None,
        })
    }
}

pub(crate) fn is_well_formed_zip(zip: &str) -> bool {
    zip.len() == 5 && zip.bytes().all(|byte| byte.is_ascii_digit())
}
