use chrono::NaiveDate;
use finsight::scoring::credit::{
    CreditScoreEngine, InvoiceId, InvoiceRecord, InvoiceRepository, RuleBasedNarrative,
    ScoringWeights,
};
use finsight::scoring::insurance::{
    AssessmentId, AssessmentRecord, AssessmentRepository, PolicyId, PolicyRepository,
    TrackedPolicy,
};
use finsight::scoring::UserId;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use finsight::scoring::credit::RepositoryError as CreditRepositoryError;
use finsight::scoring::insurance::RepositoryError as InsuranceRepositoryError;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn default_credit_engine() -> CreditScoreEngine<RuleBasedNarrative> {
    CreditScoreEngine::new(ScoringWeights::default(), RuleBasedNarrative)
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryInvoiceRepository {
    records: Arc<Mutex<HashMap<InvoiceId, InvoiceRecord>>>,
}

impl InvoiceRepository for InMemoryInvoiceRepository {
    fn insert(&self, record: InvoiceRecord) -> Result<InvoiceRecord, CreditRepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let duplicate = guard.values().any(|row| {
            row.user_id == record.user_id && row.invoice_number == record.invoice_number
        });
        if duplicate || guard.contains_key(&record.id) {
            return Err(CreditRepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn find_by_number(
        &self,
        user_id: &UserId,
        invoice_number: &str,
    ) -> Result<Option<InvoiceRecord>, CreditRepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .find(|row| &row.user_id == user_id && row.invoice_number == invoice_number)
            .cloned())
    }

    fn fetch(&self, id: &InvoiceId) -> Result<Option<InvoiceRecord>, CreditRepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list_for_user(&self, user_id: &UserId) -> Result<Vec<InvoiceRecord>, CreditRepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut rows: Vec<InvoiceRecord> = guard
            .values()
            .filter(|row| &row.user_id == user_id)
            .cloned()
            .collect();
        // Sequence ids are zero padded, so lexicographic order is insertion order.
        rows.sort_by(|a, b| a.id.0.cmp(&b.id.0));
        Ok(rows)
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryAssessmentRepository {
    records: Arc<Mutex<HashMap<AssessmentId, AssessmentRecord>>>,
}

impl AssessmentRepository for InMemoryAssessmentRepository {
    fn insert(
        &self,
        record: AssessmentRecord,
    ) -> Result<AssessmentRecord, InsuranceRepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(InsuranceRepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(
        &self,
        id: &AssessmentId,
    ) -> Result<Option<AssessmentRecord>, InsuranceRepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn mark_not_current(&self, user_id: &UserId) -> Result<(), InsuranceRepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        for row in guard.values_mut().filter(|row| &row.user_id == user_id) {
            row.is_current = false;
        }
        Ok(())
    }

    fn current_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<AssessmentRecord>, InsuranceRepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .find(|row| &row.user_id == user_id && row.is_current)
            .cloned())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryPolicyRepository {
    records: Arc<Mutex<Vec<TrackedPolicy>>>,
}

impl PolicyRepository for InMemoryPolicyRepository {
    fn insert(&self, policy: TrackedPolicy) -> Result<TrackedPolicy, InsuranceRepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.push(policy.clone());
        Ok(policy)
    }

    fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<TrackedPolicy>, InsuranceRepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .iter()
            .filter(|row| &row.user_id == user_id)
            .cloned()
            .collect())
    }

    fn remove(
        &self,
        user_id: &UserId,
        id: &PolicyId,
    ) -> Result<TrackedPolicy, InsuranceRepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let position = guard
            .iter()
            .position(|row| &row.user_id == user_id && &row.id == id)
            .ok_or(InsuranceRepositoryError::NotFound)?;
        Ok(guard.remove(position))
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
