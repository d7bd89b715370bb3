use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;
use std::sync::Arc;
use finsight::scoring::credit::{
    credit_router, InvoiceRepository, InvoiceScoringService, NarrativeGenerator,
};
use finsight::scoring::insurance::{
    insurance_router, AssessmentRepository, CatalogProvider, InsuranceAdvisorService,
    PolicyRepository,
};

pub(crate) fn with_scoring_routes<R, N, C, A, P>(
    credit: Arc<InvoiceScoringService<R, N>>,
    insurance: Arc<InsuranceAdvisorService<C, A, P>>,
) -> axum::Router
where
    R: InvoiceRepository + 'static,
    N: NarrativeGenerator + 'static,
    C: CatalogProvider + 'static,
    A: AssessmentRepository + 'static,
    P: PolicyRepository + 'static,
{
    credit_router(credit)
        .merge(insurance_router(insurance))
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
