use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{Local, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{CampaignDraft, CampaignId, ProfessionalId, VerificationStatus};
use super::repository::{
    CampaignRepository, NotificationPublisher, ProfessionalRepository, ProfessionalView,
    RepositoryError,
};
use super::service::{ProfessionalService, ProfessionalServiceError};
use crate::marketplace::billing::{Discount, PaymentMethod};
use crate::marketplace::merit::PointAdjustment;

/// Router state: the service plus the admin bearer token moderation
/// endpoints are compared against.
pub struct ProfessionalRoutes<P, C, N> {
    service: Arc<ProfessionalService<P, C, N>>,
    admin_token: Arc<str>,
}

impl<P, C, N> Clone for ProfessionalRoutes<P, C, N> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            admin_token: self.admin_token.clone(),
        }
    }
}

/// Router builder exposing the professional directory, moderation, merit,
/// campaign, and subscription endpoints.
pub fn professional_router<P, C, N>(
    service: Arc<ProfessionalService<P, C, N>>,
    admin_token: &str,
) -> Router
where
    P: ProfessionalRepository + 'static,
    C: CampaignRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let state = ProfessionalRoutes {
        service,
        admin_token: Arc::from(admin_token),
    };

    Router::new()
        .route("/api/v1/professionals", post(register_handler::<P, C, N>))
        .route(
            "/api/v1/professionals/search",
            get(search_handler::<P, C, N>),
        )
        .route(
            "/api/v1/professionals/:professional_id",
            get(profile_handler::<P, C, N>),
        )
        .route(
            "/api/v1/professionals/:professional_id/verification",
            post(verification_handler::<P, C, N>),
        )
        .route(
            "/api/v1/professionals/:professional_id/points",
            post(points_handler::<P, C, N>),
        )
        .route(
            "/api/v1/professionals/:professional_id/subscription",
            get(subscription_handler::<P, C, N>),
        )
        .route(
            "/api/v1/professionals/:professional_id/subscription/payments",
            post(payment_handler::<P, C, N>),
        )
        .route(
            "/api/v1/professionals/:professional_id/subscription/discount",
            post(discount_handler::<P, C, N>),
        )
        .route("/api/v1/campaigns", post(create_campaign_handler::<P, C, N>))
        .route(
            "/api/v1/campaigns/:campaign_id/award",
            post(award_campaign_handler::<P, C, N>),
        )
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchQuery {
    pub(crate) zip: String,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum VerificationDecision {
    Verified,
    Rejected,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VerificationRequest {
    pub(crate) status: VerificationDecision,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PointsRequest {
    pub(crate) amount: i32,
    pub(crate) reason: String,
    #[serde(default)]
    pub(crate) campaign_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PaymentRequest {
    pub(crate) method: PaymentMethod,
    #[serde(default)]
    pub(crate) force_amount_cents: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AwardRequest {
    pub(crate) professional_id: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct TransitionView {
    pub(crate) from: &'static str,
    pub(crate) to: &'static str,
    pub(crate) direction: &'static str,
}

#[derive(Debug, Serialize)]
pub(crate) struct AdjustmentView {
    pub(crate) professional_id: ProfessionalId,
    pub(crate) points: u32,
    pub(crate) level: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) transition: Option<TransitionView>,
}

impl AdjustmentView {
    fn from_adjustment(adjustment: &PointAdjustment) -> Self {
        Self {
            professional_id: adjustment.profile.professional_id.clone(),
            points: adjustment.profile.points,
            level: adjustment.profile.level().label(),
            transition: adjustment.transition.map(|transition| TransitionView {
                from: transition.from.label(),
                to: transition.to.label(),
                direction: transition.direction_label(),
            }),
        }
    }
}

pub(crate) fn authorized_admin(headers: &HeaderMap, admin_token: &str) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map_or(false, |token| token == admin_token)
}

pub(crate) fn admin_required_response() -> Response {
    let payload = json!({ "error": "admin token required" });
    (StatusCode::UNAUTHORIZED, axum::Json(payload)).into_response()
}

fn error_response(error: ProfessionalServiceError) -> Response {
    let status = match &error {
        ProfessionalServiceError::Registration(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ProfessionalServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        ProfessionalServiceError::Repository(RepositoryError::Conflict)
        | ProfessionalServiceError::CampaignClosed { .. }
        | ProfessionalServiceError::NoSubscription => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn register_handler<P, C, N>(
    State(routes): State<ProfessionalRoutes<P, C, N>>,
    axum::Json(submission): axum::Json<super::domain::RegistrationSubmission>,
) -> Response
where
    P: ProfessionalRepository + 'static,
    C: CampaignRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match routes.service.register(submission) {
        Ok(profile) => {
            let view = ProfessionalView::from_profile(&profile);
            (StatusCode::ACCEPTED, axum::Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn profile_handler<P, C, N>(
    State(routes): State<ProfessionalRoutes<P, C, N>>,
    Path(professional_id): Path<String>,
) -> Response
where
    P: ProfessionalRepository + 'static,
    C: CampaignRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let id = ProfessionalId(professional_id);
    match routes.service.get(&id) {
        Ok(profile) => {
            let view = ProfessionalView::from_profile(&profile);
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn search_handler<P, C, N>(
    State(routes): State<ProfessionalRoutes<P, C, N>>,
    Query(query): Query<SearchQuery>,
) -> Response
where
    P: ProfessionalRepository + 'static,
    C: CampaignRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match routes.service.search(query.zip.trim()) {
        Ok(profiles) => {
            let views: Vec<ProfessionalView> =
                profiles.iter().map(ProfessionalView::from_profile).collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn verification_handler<P, C, N>(
    State(routes): State<ProfessionalRoutes<P, C, N>>,
    Path(professional_id): Path<String>,
    headers: HeaderMap,
    axum::Json(request): axum::Json<VerificationRequest>,
) -> Response
where
    P: ProfessionalRepository + 'static,
    C: CampaignRepository + 'static,
    N: NotificationPublisher + 'static,
{
    if !authorized_admin(&headers, &routes.admin_token) {
        return admin_required_response();
    }

    let decision = match request.status {
        VerificationDecision::Verified => VerificationStatus::Verified,
        VerificationDecision::Rejected => VerificationStatus::Rejected,
    };

    let id = ProfessionalId(professional_id);
    match routes.service.moderate(&id, decision) {
        Ok(profile) => {
            let view = ProfessionalView::from_profile(&profile);
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn points_handler<P, C, N>(
    State(routes): State<ProfessionalRoutes<P, C, N>>,
    Path(professional_id): Path<String>,
    headers: HeaderMap,
    axum::Json(request): axum::Json<PointsRequest>,
) -> Response
where
    P: ProfessionalRepository + 'static,
    C: CampaignRepository + 'static,
    N: NotificationPublisher + 'static,
{
    if !authorized_admin(&headers, &routes.admin_token) {
        return admin_required_response();
    }

    let id = ProfessionalId(professional_id);
    let campaign_id = request.campaign_id.map(CampaignId);
    match routes
        .service
        .adjust_points(&id, request.amount, &request.reason, campaign_id, Utc::now())
    {
        Ok(adjustment) => {
            let view = AdjustmentView::from_adjustment(&adjustment);
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn subscription_handler<P, C, N>(
    State(routes): State<ProfessionalRoutes<P, C, N>>,
    Path(professional_id): Path<String>,
) -> Response
where
    P: ProfessionalRepository + 'static,
    C: CampaignRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let id = ProfessionalId(professional_id);
    let today = Local::now().date_naive();
    match routes.service.subscription_status(&id, today) {
        Ok(subscription) => {
            let payload = json!({ "subscription": subscription });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn payment_handler<P, C, N>(
    State(routes): State<ProfessionalRoutes<P, C, N>>,
    Path(professional_id): Path<String>,
    axum::Json(request): axum::Json<PaymentRequest>,
) -> Response
where
    P: ProfessionalRepository + 'static,
    C: CampaignRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let id = ProfessionalId(professional_id);
    let today = Local::now().date_naive();
    match routes
        .service
        .pay_subscription(&id, request.method, request.force_amount_cents, today)
    {
        Ok(subscription) => (StatusCode::OK, axum::Json(subscription)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn discount_handler<P, C, N>(
    State(routes): State<ProfessionalRoutes<P, C, N>>,
    Path(professional_id): Path<String>,
    headers: HeaderMap,
    axum::Json(discount): axum::Json<Discount>,
) -> Response
where
    P: ProfessionalRepository + 'static,
    C: CampaignRepository + 'static,
    N: NotificationPublisher + 'static,
{
    if !authorized_admin(&headers, &routes.admin_token) {
        return admin_required_response();
    }

    let id = ProfessionalId(professional_id);
    match routes.service.grant_discount(&id, discount) {
        Ok(subscription) => (StatusCode::OK, axum::Json(subscription)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn create_campaign_handler<P, C, N>(
    State(routes): State<ProfessionalRoutes<P, C, N>>,
    headers: HeaderMap,
    axum::Json(draft): axum::Json<CampaignDraft>,
) -> Response
where
    P: ProfessionalRepository + 'static,
    C: CampaignRepository + 'static,
    N: NotificationPublisher + 'static,
{
    if !authorized_admin(&headers, &routes.admin_token) {
        return admin_required_response();
    }

    match routes.service.create_campaign(draft) {
        Ok(campaign) => (StatusCode::CREATED, axum::Json(campaign)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn award_campaign_handler<P, C, N>(
    State(routes): State<ProfessionalRoutes<P, C, N>>,
    Path(campaign_id): Path<String>,
    headers: HeaderMap,
    axum::Json(request): axum::Json<AwardRequest>,
) -> Response
where
    P: ProfessionalRepository + 'static,
    C: CampaignRepository + 'static,
    N: NotificationPublisher + 'static,
{
    if !authorized_admin(&headers, &routes.admin_token) {
        return admin_required_response();
    }

    let campaign = CampaignId(campaign_id);
    let professional = ProfessionalId(request.professional_id);
    let today = Local::now().date_naive();
    match routes
        .service
        .award_campaign(&campaign, &professional, today, Utc::now())
    {
        Ok(adjustment) => {
            let view = AdjustmentView::from_adjustment(&adjustment);
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}
