use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use super::catalog::CatalogProvider;
use super::domain::{AssessmentId, BusinessAssessment, NewPolicy, PolicyId};
use super::repository::{AssessmentRepository, PolicyRepository, RepositoryError};
use super::service::{InsuranceAdvisorService, InsuranceServiceError, DEFAULT_REMINDER_WINDOW_DAYS};
use crate::scoring::UserId;

/// Router builder exposing HTTP endpoints for assessment, the product
/// catalog, and policy tracking.
pub fn insurance_router<C, A, P>(service: Arc<InsuranceAdvisorService<C, A, P>>) -> Router
where
    C: CatalogProvider + 'static,
    A: AssessmentRepository + 'static,
    P: PolicyRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/insurance/:user_id/assessments",
            post(assess_handler::<C, A, P>).get(current_assessment_handler::<C, A, P>),
        )
        .route(
            "/api/v1/insurance/:user_id/assessments/:assessment_id",
            get(assessment_handler::<C, A, P>),
        )
        .route(
            "/api/v1/insurance/templates",
            get(templates_handler::<C, A, P>),
        )
        .route(
            "/api/v1/insurance/:user_id/policies",
            post(add_policy_handler::<C, A, P>).get(list_policies_handler::<C, A, P>),
        )
        .route(
            "/api/v1/insurance/:user_id/policies/:policy_id",
            axum::routing::delete(remove_policy_handler::<C, A, P>),
        )
        .route(
            "/api/v1/insurance/:user_id/reminders",
            get(reminders_handler::<C, A, P>),
        )
        .with_state(service)
}

pub(crate) async fn assess_handler<C, A, P>(
    State(service): State<Arc<InsuranceAdvisorService<C, A, P>>>,
    Path(user_id): Path<String>,
    axum::Json(assessment): axum::Json<BusinessAssessment>,
) -> Response
where
    C: CatalogProvider + 'static,
    A: AssessmentRepository + 'static,
    P: PolicyRepository + 'static,
{
    match service.assess(UserId(user_id), assessment) {
        Ok(outcome) => {
            let payload = json!({
                "catalog_empty": outcome.catalog_empty,
                "assessment": outcome.record,
            });
            (StatusCode::CREATED, axum::Json(payload)).into_response()
        }
        Err(error) => insurance_error_response(error),
    }
}

pub(crate) async fn assessment_handler<C, A, P>(
    State(service): State<Arc<InsuranceAdvisorService<C, A, P>>>,
    Path((user_id, assessment_id)): Path<(String, String)>,
) -> Response
where
    C: CatalogProvider + 'static,
    A: AssessmentRepository + 'static,
    P: PolicyRepository + 'static,
{
    match service.assessment(&UserId(user_id), &AssessmentId(assessment_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(error) => insurance_error_response(error),
    }
}

pub(crate) async fn current_assessment_handler<C, A, P>(
    State(service): State<Arc<InsuranceAdvisorService<C, A, P>>>,
    Path(user_id): Path<String>,
) -> Response
where
    C: CatalogProvider + 'static,
    A: AssessmentRepository + 'static,
    P: PolicyRepository + 'static,
{
    match service.current_assessment(&UserId(user_id)) {
        Ok(Some(record)) => (StatusCode::OK, axum::Json(record)).into_response(),
        Ok(None) => {
            let payload = json!({
                "error": "no current assessment",
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(error) => insurance_error_response(error),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct TemplateFilter {
    business_type: Option<String>,
    policy_type: Option<String>,
}

pub(crate) async fn templates_handler<C, A, P>(
    State(service): State<Arc<InsuranceAdvisorService<C, A, P>>>,
    Query(filter): Query<TemplateFilter>,
) -> Response
where
    C: CatalogProvider + 'static,
    A: AssessmentRepository + 'static,
    P: PolicyRepository + 'static,
{
    match service.templates(filter.business_type.as_deref(), filter.policy_type.as_deref()) {
        Ok(templates) => (StatusCode::OK, axum::Json(templates)).into_response(),
        Err(error) => insurance_error_response(error),
    }
}

pub(crate) async fn add_policy_handler<C, A, P>(
    State(service): State<Arc<InsuranceAdvisorService<C, A, P>>>,
    Path(user_id): Path<String>,
    axum::Json(policy): axum::Json<NewPolicy>,
) -> Response
where
    C: CatalogProvider + 'static,
    A: AssessmentRepository + 'static,
    P: PolicyRepository + 'static,
{
    match service.add_policy(UserId(user_id), policy) {
        Ok(stored) => (StatusCode::CREATED, axum::Json(stored)).into_response(),
        Err(error) => insurance_error_response(error),
    }
}

pub(crate) async fn list_policies_handler<C, A, P>(
    State(service): State<Arc<InsuranceAdvisorService<C, A, P>>>,
    Path(user_id): Path<String>,
) -> Response
where
    C: CatalogProvider + 'static,
    A: AssessmentRepository + 'static,
    P: PolicyRepository + 'static,
{
    let today = Utc::now().date_naive();
    match service.policies(&UserId(user_id), today) {
        Ok(policies) => (StatusCode::OK, axum::Json(policies)).into_response(),
        Err(error) => insurance_error_response(error),
    }
}

pub(crate) async fn remove_policy_handler<C, A, P>(
    State(service): State<Arc<InsuranceAdvisorService<C, A, P>>>,
    Path((user_id, policy_id)): Path<(String, String)>,
) -> Response
where
    C: CatalogProvider + 'static,
    A: AssessmentRepository + 'static,
    P: PolicyRepository + 'static,
{
    match service.remove_policy(&UserId(user_id), &PolicyId(policy_id)) {
        Ok(removed) => (StatusCode::OK, axum::Json(removed)).into_response(),
        Err(error) => insurance_error_response(error),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReminderWindow {
    window_days: Option<i64>,
}

pub(crate) async fn reminders_handler<C, A, P>(
    State(service): State<Arc<InsuranceAdvisorService<C, A, P>>>,
    Path(user_id): Path<String>,
    Query(window): Query<ReminderWindow>,
) -> Response
where
    C: CatalogProvider + 'static,
    A: AssessmentRepository + 'static,
    P: PolicyRepository + 'static,
{
    let today = Utc::now().date_naive();
    let window_days = window.window_days.unwrap_or(DEFAULT_REMINDER_WINDOW_DAYS);
    match service.reminders(&UserId(user_id), today, window_days) {
        Ok(due) => (StatusCode::OK, axum::Json(due)).into_response(),
        Err(error) => insurance_error_response(error),
    }
}

fn insurance_error_response(error: InsuranceServiceError) -> Response {
    let (status, message) = match &error {
        InsuranceServiceError::Validation(message) => {
            (StatusCode::UNPROCESSABLE_ENTITY, message.clone())
        }
        InsuranceServiceError::Repository(RepositoryError::NotFound) => {
            (StatusCode::NOT_FOUND, "record not found".to_string())
        }
        InsuranceServiceError::Repository(RepositoryError::Conflict) => {
            (StatusCode::CONFLICT, "record already exists".to_string())
        }
        _ => (StatusCode::INTERNAL_SERVER_ERROR, error.to_string()),
    };
    let payload = json!({
        "error": message,
    });
    (status, axum::Json(payload)).into_response()
}
