use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{LeadId, LeadRequest};
use super::repository::{LeadRepository, LeadView};
use super::service::{LeadService, LeadServiceError};
use crate::marketplace::professionals::domain::ProfessionalId;
use crate::marketplace::professionals::repository::{
    NotificationPublisher, ProfessionalRepository, ProfessionalView, RepositoryError,
};

/// Router builder exposing the client-facing lead endpoints.
pub fn lead_router<L, P, N>(service: Arc<LeadService<L, P, N>>) -> Router
where
    L: LeadRepository + 'static,
    P: ProfessionalRepository + 'static,
    N: NotificationPublisher + 'static,
{
    Router::new()
        .route("/api/v1/leads", post(submit_handler::<L, P, N>))
        .route("/api/v1/leads/:lead_id", get(lead_handler::<L, P, N>))
        .route(
            "/api/v1/leads/:lead_id/matches",
            get(matches_handler::<L, P, N>),
        )
        .route(
            "/api/v1/leads/:lead_id/accept",
            post(accept_handler::<L, P, N>),
        )
        .route(
            "/api/v1/leads/:lead_id/complete",
            post(complete_handler::<L, P, N>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct ClaimRequest {
    pub(crate) professional_id: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct AcceptanceView {
    pub(crate) lead: LeadView,
    pub(crate) professional: ProfessionalView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) level_change: Option<String>,
}

fn error_response(error: LeadServiceError) -> Response {
    let status = match &error {
        LeadServiceError::MalformedZip(_) => StatusCode::UNPROCESSABLE_ENTITY,
        LeadServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        LeadServiceError::Repository(RepositoryError::Conflict)
        | LeadServiceError::InvalidTransition { .. }
        | LeadServiceError::NotAssignee => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn submit_handler<L, P, N>(
    State(service): State<Arc<LeadService<L, P, N>>>,
    axum::Json(request): axum::Json<LeadRequest>,
) -> Response
where
    L: LeadRepository + 'static,
    P: ProfessionalRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.submit(request, Utc::now()) {
        Ok(lead) => {
            let view = LeadView::from_lead(&lead);
            (StatusCode::ACCEPTED, axum::Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn lead_handler<L, P, N>(
    State(service): State<Arc<LeadService<L, P, N>>>,
    Path(lead_id): Path<String>,
) -> Response
where
    L: LeadRepository + 'static,
    P: ProfessionalRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let id = LeadId(lead_id);
    match service.get(&id) {
        Ok(lead) => {
            let view = LeadView::from_lead(&lead);
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn matches_handler<L, P, N>(
    State(service): State<Arc<LeadService<L, P, N>>>,
    Path(lead_id): Path<String>,
) -> Response
where
    L: LeadRepository + 'static,
    P: ProfessionalRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let id = LeadId(lead_id);
    match service.eligible_professionals(&id) {
        Ok(profiles) => {
            let views: Vec<ProfessionalView> =
                profiles.iter().map(ProfessionalView::from_profile).collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn accept_handler<L, P, N>(
    State(service): State<Arc<LeadService<L, P, N>>>,
    Path(lead_id): Path<String>,
    axum::Json(request): axum::Json<ClaimRequest>,
) -> Response
where
    L: LeadRepository + 'static,
    P: ProfessionalRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let id = LeadId(lead_id);
    let professional_id = ProfessionalId(request.professional_id);
    match service.accept(&id, &professional_id, Utc::now()) {
        Ok(acceptance) => {
            let view = AcceptanceView {
                lead: LeadView::from_lead(&acceptance.lead),
                professional: ProfessionalView::from_profile(&acceptance.professional),
                level_change: acceptance
                    .transition
                    .map(|transition| transition.direction_label().to_string()),
            };
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn complete_handler<L, P, N>(
    State(service): State<Arc<LeadService<L, P, N>>>,
    Path(lead_id): Path<String>,
    axum::Json(request): axum::Json<ClaimRequest>,
) -> Response
where
    L: LeadRepository + 'static,
    P: ProfessionalRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let id = LeadId(lead_id);
    let professional_id = ProfessionalId(request.professional_id);
    match service.complete(&id, &professional_id) {
        Ok(lead) => {
            let view = LeadView::from_lead(&lead);
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}
