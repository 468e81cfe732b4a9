use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::marketplace::professionals::domain::ProfessionalId;

/// Identifier wrapper for client service requests.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LeadId(pub String);

/// Kind of cleaning the client is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    Standard,
    Deep,
    MoveOut,
    PostConstruction,
}

impl ServiceType {
    pub const fn label(self) -> &'static str {
        match self {
            ServiceType::Standard => "standard",
            ServiceType::Deep => "deep",
            ServiceType::MoveOut => "move_out",
            ServiceType::PostConstruction => "post_construction",
        }
    }
}

/// Raw client submission describing the job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadRequest {
    pub client_name: String,
    pub client_email: String,
    pub zip_code: String,
    pub service_type: ServiceType,
    pub bedrooms: u8,
    pub bathrooms: u8,
    pub requested_date: NaiveDate,
}

/// Lifecycle of a lead: open for acceptance, claimed by one professional,
/// then completed. No other transitions exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeadStatus {
    Open,
    Accepted,
    Completed,
}

impl LeadStatus {
    pub const fn label(self) -> &'static str {
        match self {
            LeadStatus::Open => "open",
            LeadStatus::Accepted => "accepted",
            LeadStatus::Completed => "completed",
        }
    }
}

/// A client service request broadcast to eligible professionals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    pub lead_id: LeadId,
    pub request: LeadRequest,
    pub status: LeadStatus,
    pub accepted_by: Option<ProfessionalId>,
    pub submitted_at: DateTime<Utc>,
}
