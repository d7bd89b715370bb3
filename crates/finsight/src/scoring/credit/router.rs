use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::domain::{FinancialSnapshot, InvoiceSubmission, SnapshotError};
use super::narrative::NarrativeGenerator;
use super::repository::{InvoiceRepository, RepositoryError};
use super::service::{InvoiceScoringService, InvoiceServiceError};
use crate::scoring::UserId;

/// Router builder exposing HTTP endpoints for invoice upload and scoring.
pub fn credit_router<R, N>(service: Arc<InvoiceScoringService<R, N>>) -> Router
where
    R: InvoiceRepository + 'static,
    N: NarrativeGenerator + 'static,
{
    Router::new()
        .route(
            "/api/v1/credit/:user_id/invoices",
            post(record_invoice_handler::<R, N>).get(list_invoices_handler::<R, N>),
        )
        .route(
            "/api/v1/credit/:user_id/dashboard",
            get(dashboard_handler::<R, N>),
        )
        .route("/api/v1/credit/score", post(score_handler::<R, N>))
        .with_state(service)
}

pub(crate) async fn record_invoice_handler<R, N>(
    State(service): State<Arc<InvoiceScoringService<R, N>>>,
    Path(user_id): Path<String>,
    axum::Json(submission): axum::Json<InvoiceSubmission>,
) -> Response
where
    R: InvoiceRepository + 'static,
    N: NarrativeGenerator + 'static,
{
    match service.record_invoice(UserId(user_id), submission) {
        Ok(recorded) => {
            let status = if recorded.duplicate {
                StatusCode::OK
            } else {
                StatusCode::CREATED
            };
            let payload = json!({
                "duplicate": recorded.duplicate,
                "invoice": recorded.record,
            });
            (status, axum::Json(payload)).into_response()
        }
        Err(error) => invoice_error_response(error),
    }
}

pub(crate) async fn list_invoices_handler<R, N>(
    State(service): State<Arc<InvoiceScoringService<R, N>>>,
    Path(user_id): Path<String>,
) -> Response
where
    R: InvoiceRepository + 'static,
    N: NarrativeGenerator + 'static,
{
    match service.invoices(&UserId(user_id)) {
        Ok(invoices) => (StatusCode::OK, axum::Json(invoices)).into_response(),
        Err(error) => invoice_error_response(error),
    }
}

pub(crate) async fn dashboard_handler<R, N>(
    State(service): State<Arc<InvoiceScoringService<R, N>>>,
    Path(user_id): Path<String>,
) -> Response
where
    R: InvoiceRepository + 'static,
    N: NarrativeGenerator + 'static,
{
    match service.dashboard(&UserId(user_id)) {
        Ok(dashboard) => (StatusCode::OK, axum::Json(dashboard)).into_response(),
        Err(error) => invoice_error_response(error),
    }
}

pub(crate) async fn score_handler<R, N>(
    State(service): State<Arc<InvoiceScoringService<R, N>>>,
    axum::Json(snapshot): axum::Json<FinancialSnapshot>,
) -> Response
where
    R: InvoiceRepository + 'static,
    N: NarrativeGenerator + 'static,
{
    match service.score_snapshot(&snapshot) {
        Ok(analysis) => (StatusCode::OK, axum::Json(analysis)).into_response(),
        Err(error) => invoice_error_response(error),
    }
}

fn invoice_error_response(error: InvoiceServiceError) -> Response {
    let (status, message) = match &error {
        InvoiceServiceError::Validation(message) => {
            (StatusCode::UNPROCESSABLE_ENTITY, message.clone())
        }
        InvoiceServiceError::Snapshot(SnapshotError::NoInvoices)
        | InvoiceServiceError::Snapshot(SnapshotError::Unreconciled { .. }) => {
            (StatusCode::UNPROCESSABLE_ENTITY, error.to_string())
        }
        InvoiceServiceError::Repository(RepositoryError::Conflict) => {
            (StatusCode::CONFLICT, "invoice already exists".to_string())
        }
        InvoiceServiceError::Repository(RepositoryError::NotFound) => {
            (StatusCode::NOT_FOUND, "invoice not found".to_string())
        }
        _ => (StatusCode::INTERNAL_SERVER_ERROR, error.to_string()),
    };
    let payload = json!({
        "error": message,
    });
    (status, axum::Json(payload)).into_response()
}
