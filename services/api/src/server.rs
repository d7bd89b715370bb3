use crate::cli::ServeArgs;
use crate::infra::{
    default_credit_engine, AppState, InMemoryAssessmentRepository, InMemoryInvoiceRepository,
    InMemoryPolicyRepository,
};
use crate::routes::with_scoring_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use finsight::config::AppConfig;
use finsight::error::AppError;
use finsight::scoring::credit::InvoiceScoringService;
use finsight::scoring::insurance::{InsuranceAdvisorService, StaticCatalog};
use finsight::telemetry;
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

    let credit_service = Arc::new(InvoiceScoringService::new(
        Arc::new(InMemoryInvoiceRepository::default()),
        Arc::new(default_credit_engine()),
    ));
    let insurance_service = Arc::new(InsuranceAdvisorService::new(
        Arc::new(StaticCatalog::standard()),
        Arc::new(InMemoryAssessmentRepository::default()),
        Arc::new(InMemoryPolicyRepository::default()),
    ));

    let app = with_scoring_routes(credit_service, insurance_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "scoring service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
