use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use cleanmatch::marketplace::leads::{lead_router, LeadRepository, LeadService};
use cleanmatch::marketplace::professionals::{
    professional_router, CampaignRepository, NotificationPublisher, ProfessionalRepository,
    ProfessionalService,
};
use cleanmatch::marketplace::support::{support_router, SupportDesk, TicketRepository};
use serde_json::json;
use std::sync::Arc;

/// Compose the marketplace routers with the operational endpoints.
pub(crate) fn with_marketplace_routes<P, C, N, L, T>(
    professionals: Arc<ProfessionalService<P, C, N>>,
    leads: Arc<LeadService<L, P, N>>,
    desk: Arc<SupportDesk<T>>,
    admin_token: &str,
) -> axum::Router
where
    P: ProfessionalRepository + 'static,
    C: CampaignRepository + 'static,
    N: NotificationPublisher + 'static,
    L: LeadRepository + 'static,
    T: TicketRepository + 'static,
{
    professional_router(professionals, admin_token)
        .merge(lead_router(leads))
        .merge(support_router(desk, admin_token))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
