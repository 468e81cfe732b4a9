//! Client lead intake, broadcast eligibility, and the accept/complete
//! lifecycle that feeds the merit engine.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{Lead, LeadId, LeadRequest, LeadStatus, ServiceType};
pub use repository::{LeadRepository, LeadView};
pub use router::lead_router;
pub use service::{LeadAcceptance, LeadService, LeadServiceError, MeritRewards};
