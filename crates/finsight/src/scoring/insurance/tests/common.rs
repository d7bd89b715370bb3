use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::scoring::insurance::catalog::StaticCatalog;
use crate::scoring::insurance::domain::{
    AssessmentId, AssessmentPreferences, AssessmentRecord, BusinessAssessment, NewPolicy,
    PolicyId, TrackedPolicy,
};
use crate::scoring::insurance::repository::{
    AssessmentRepository, PolicyRepository, RepositoryError,
};
use crate::scoring::insurance::service::InsuranceAdvisorService;
use crate::scoring::UserId;

pub(super) fn user() -> UserId {
    UserId("owner-7".to_string())
}

pub(super) fn retail_assessment() -> BusinessAssessment {
    let mut assets = BTreeMap::new();
    assets.insert("inventory".to_string(), 800_000.0);
    assets.insert("equipment".to_string(), 400_000.0);
    BusinessAssessment {
        business_type: "retail".to_string(),
        industry: Some("retail".to_string()),
        employee_count: 15,
        assets,
        primary_concerns: vec!["fire".to_string(), "theft".to_string()],
        preferences: AssessmentPreferences::default(),
    }
}

pub(super) fn new_policy(expiry: NaiveDate) -> NewPolicy {
    NewPolicy {
        policy_name: "Fire & Theft Insurance".to_string(),
        provider: "Oriental Insurance".to_string(),
        policy_type: "asset_protection".to_string(),
        premium: 10_000.0,
        coverage: 1_500_000.0,
        start_date: NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid date"),
        expiry_date: expiry,
    }
}

pub(super) fn day(year: i32, month: u32, dom: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, dom).expect("valid date")
}

pub(super) type MemoryService =
    InsuranceAdvisorService<StaticCatalog, MemoryAssessments, MemoryPolicies>;

pub(super) fn build_service() -> (MemoryService, Arc<MemoryAssessments>, Arc<MemoryPolicies>) {
    build_service_with_catalog(StaticCatalog::standard())
}

pub(super) fn build_service_with_catalog(
    catalog: StaticCatalog,
) -> (MemoryService, Arc<MemoryAssessments>, Arc<MemoryPolicies>) {
    let assessments = Arc::new(MemoryAssessments::default());
    let policies = Arc::new(MemoryPolicies::default());
    let service =
        InsuranceAdvisorService::new(Arc::new(catalog), assessments.clone(), policies.clone());
    (service, assessments, policies)
}

#[derive(Default, Clone)]
pub(super) struct MemoryAssessments {
    pub(super) records: Arc<Mutex<Vec<AssessmentRecord>>>,
}

impl AssessmentRepository for MemoryAssessments {
    fn insert(&self, record: AssessmentRecord) -> Result<AssessmentRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.iter().any(|row| row.id == record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &AssessmentId) -> Result<Option<AssessmentRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.iter().find(|row| &row.id == id).cloned())
    }

    fn mark_not_current(&self, user_id: &UserId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        for row in guard.iter_mut().filter(|row| &row.user_id == user_id) {
            row.is_current = false;
        }
        Ok(())
    }

    fn current_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<AssessmentRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .iter()
            .find(|row| &row.user_id == user_id && row.is_current)
            .cloned())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryPolicies {
    pub(super) records: Arc<Mutex<Vec<TrackedPolicy>>>,
}

impl PolicyRepository for MemoryPolicies {
    fn insert(&self, policy: TrackedPolicy) -> Result<TrackedPolicy, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.push(policy.clone());
        Ok(policy)
    }

    fn list_for_user(&self, user_id: &UserId) -> Result<Vec<TrackedPolicy>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .iter()
            .filter(|row| &row.user_id == user_id)
            .cloned()
            .collect())
    }

    fn remove(&self, user_id: &UserId, id: &PolicyId) -> Result<TrackedPolicy, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let position = guard
            .iter()
            .position(|row| &row.user_id == user_id && &row.id == id)
            .ok_or(RepositoryError::NotFound)?;
        Ok(guard.remove(position))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 256 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
