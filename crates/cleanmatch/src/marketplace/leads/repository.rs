use serde::Serialize;

use super::domain::{Lead, LeadId};
use crate::marketplace::professionals::repository::RepositoryError;

/// Storage abstraction for leads; shares the marketplace repository error
/// taxonomy.
pub trait LeadRepository: Send + Sync {
    fn insert(&self, lead: Lead) -> Result<Lead, RepositoryError>;
    fn update(&self, lead: Lead) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &LeadId) -> Result<Option<Lead>, RepositoryError>;
    fn open(&self) -> Result<Vec<Lead>, RepositoryError>;
}

/// Sanitized representation of a lead for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct LeadView {
    pub lead_id: LeadId,
    pub status: &'static str,
    pub zip_code: String,
    pub service_type: &'static str,
    pub bedrooms: u8,
    pub bathrooms: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accepted_by: Option<String>,
}

impl LeadView {
    pub fn from_lead(lead: &Lead) -> Self {
        Self {
            lead_id: lead.lead_id.clone(),
            status: lead.status.label(),
            zip_code: lead.request.zip_code.clone(),
            service_type: lead.request.service_type.label(),
            bedrooms: lead.request.bedrooms,
            bathrooms: lead.request.bathrooms,
            accepted_by: lead.accepted_by.as_ref().map(|id| id.0.clone()),
        }
    }
}
