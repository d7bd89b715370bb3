use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::scoring::credit::domain::{
    CreditScoreAnalysis, FinancialSnapshot, InvoiceId, InvoiceRecord, InvoiceStatus,
    InvoiceSubmission, LineItem, ScoreCategory,
};
use crate::scoring::credit::engine::{CreditScoreEngine, ScoringWeights};
use crate::scoring::credit::narrative::{
    Narrative, NarrativeContext, NarrativeError, NarrativeGenerator, RuleBasedNarrative,
};
use crate::scoring::credit::repository::{InvoiceRepository, RepositoryError};
use crate::scoring::credit::service::InvoiceScoringService;
use crate::scoring::UserId;

pub(super) fn user() -> UserId {
    UserId("user-42".to_string())
}

pub(super) fn submission(invoice_number: &str, total_amount: f64) -> InvoiceSubmission {
    InvoiceSubmission {
        invoice_number: invoice_number.to_string(),
        client: "Meridian Traders".to_string(),
        date: None,
        payment_terms: Some("NET 30".to_string()),
        industry: Some("retail".to_string()),
        total_amount,
        currency: None,
        tax_amount: total_amount * 0.1,
        extra_charges: 0.0,
        line_items: Vec::new(),
    }
}

pub(super) fn line_item_submission() -> InvoiceSubmission {
    InvoiceSubmission {
        tax_amount: 0.0,
        line_items: vec![
            LineItem {
                description: "Consulting hours".to_string(),
                amount: 6000.0,
            },
            LineItem {
                description: "Materials".to_string(),
                amount: 3000.0,
            },
        ],
        ..submission("INV-EST-1", 10_000.0)
    }
}

pub(super) fn balanced_snapshot() -> FinancialSnapshot {
    FinancialSnapshot {
        no_of_invoices: 4,
        total_amount: 100_000.0,
        total_amount_pending: 20_000.0,
        total_amount_paid: 80_000.0,
        tax: 10_000.0,
        extra_charges: 0.0,
        payment_completion_rate: 1.0,
        paid_to_pending_ratio: 4.0,
    }
}

pub(super) fn engine() -> CreditScoreEngine<RuleBasedNarrative> {
    CreditScoreEngine::new(ScoringWeights::default(), RuleBasedNarrative)
}

pub(super) fn build_service() -> (
    InvoiceScoringService<MemoryInvoiceRepository, RuleBasedNarrative>,
    Arc<MemoryInvoiceRepository>,
) {
    let repository = Arc::new(MemoryInvoiceRepository::default());
    let service = InvoiceScoringService::new(repository.clone(), Arc::new(engine()));
    (service, repository)
}

pub(super) fn stored_record(invoice_number: &str, credit_score: f64) -> InvoiceRecord {
    InvoiceRecord {
        id: InvoiceId(format!("inv-fixed-{invoice_number}")),
        user_id: user(),
        invoice_number: invoice_number.to_string(),
        client: "Meridian Traders".to_string(),
        date: None,
        total_amount: 10_000.0,
        currency: "INR".to_string(),
        tax_amount: 1_000.0,
        extra_charges: 0.0,
        line_items: Vec::new(),
        status: InvoiceStatus::Paid,
        credit_score,
        credit_score_data: CreditScoreAnalysis {
            final_weighted_credit_score: credit_score,
            score_category: ScoreCategory::for_score(credit_score),
            factor_breakdown: Default::default(),
            detailed_analysis: Default::default(),
            recommendations: Default::default(),
        },
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryInvoiceRepository {
    pub(super) records: Arc<Mutex<Vec<InvoiceRecord>>>,
}

impl InvoiceRepository for MemoryInvoiceRepository {
    fn insert(&self, record: InvoiceRecord) -> Result<InvoiceRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard
            .iter()
            .any(|row| row.user_id == record.user_id && row.invoice_number == record.invoice_number)
        {
            return Err(RepositoryError::Conflict);
        }
        guard.push(record.clone());
        Ok(record)
    }

    fn find_by_number(
        &self,
        user_id: &UserId,
        invoice_number: &str,
    ) -> Result<Option<InvoiceRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .iter()
            .find(|row| &row.user_id == user_id && row.invoice_number == invoice_number)
            .cloned())
    }

    fn fetch(&self, id: &InvoiceId) -> Result<Option<InvoiceRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.iter().find(|row| &row.id == id).cloned())
    }

    fn list_for_user(&self, user_id: &UserId) -> Result<Vec<InvoiceRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .iter()
            .filter(|row| &row.user_id == user_id)
            .cloned()
            .collect())
    }
}

/// Repository that loses every insert race: the lookup misses, the insert
/// conflicts, and the retry lookup finds the winner's record.
pub(super) struct RacingRepository {
    pub(super) winner: InvoiceRecord,
    looked_up: AtomicBool,
}

impl RacingRepository {
    pub(super) fn new(winner: InvoiceRecord) -> Self {
        Self {
            winner,
            looked_up: AtomicBool::new(false),
        }
    }
}

impl InvoiceRepository for RacingRepository {
    fn insert(&self, _record: InvoiceRecord) -> Result<InvoiceRecord, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn find_by_number(
        &self,
        _user_id: &UserId,
        _invoice_number: &str,
    ) -> Result<Option<InvoiceRecord>, RepositoryError> {
        if self.looked_up.swap(true, Ordering::SeqCst) {
            Ok(Some(self.winner.clone()))
        } else {
            Ok(None)
        }
    }

    fn fetch(&self, _id: &InvoiceId) -> Result<Option<InvoiceRecord>, RepositoryError> {
        Ok(None)
    }

    fn list_for_user(&self, _user_id: &UserId) -> Result<Vec<InvoiceRecord>, RepositoryError> {
        Ok(Vec::new())
    }
}

pub(super) struct UnavailableRepository;

impl InvoiceRepository for UnavailableRepository {
    fn insert(&self, _record: InvoiceRecord) -> Result<InvoiceRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn find_by_number(
        &self,
        _user_id: &UserId,
        _invoice_number: &str,
    ) -> Result<Option<InvoiceRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &InvoiceId) -> Result<Option<InvoiceRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list_for_user(&self, _user_id: &UserId) -> Result<Vec<InvoiceRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) struct FailingNarrator;

impl NarrativeGenerator for FailingNarrator {
    fn narrate(&self, _context: &NarrativeContext<'_>) -> Result<Narrative, NarrativeError> {
        Err(NarrativeError::Unavailable("model endpoint down".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
