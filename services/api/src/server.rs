use crate::cli::ServeArgs;
use crate::infra::{
    AppState, InMemoryCampaignRepository, InMemoryLeadRepository, InMemoryNotifier,
    InMemoryProfessionalRepository, InMemoryTicketRepository,
};
use crate::routes::with_marketplace_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use cleanmatch::config::AppConfig;
use cleanmatch::error::AppError;
use cleanmatch::marketplace::leads::{LeadService, MeritRewards};
use cleanmatch::marketplace::professionals::ProfessionalService;
use cleanmatch::marketplace::support::SupportDesk;
use cleanmatch::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let profiles = Arc::new(InMemoryProfessionalRepository::default());
    let campaigns = Arc::new(InMemoryCampaignRepository::default());
    let lead_store = Arc::new(InMemoryLeadRepository::default());
    let tickets = Arc::new(InMemoryTicketRepository::default());
    let notifier = Arc::new(InMemoryNotifier::default());

    let professional_service = Arc::new(ProfessionalService::new(
        profiles.clone(),
        campaigns,
        notifier.clone(),
    ));
    let lead_service = Arc::new(LeadService::new(
        lead_store,
        profiles,
        notifier,
        MeritRewards::default(),
    ));
    let support_desk = Arc::new(SupportDesk::new(tickets));

    let app = with_marketplace_routes(
        professional_service,
        lead_service,
        support_desk,
        &config.admin.token,
    )
    .layer(Extension(app_state))
    .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "cleaning marketplace service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
