use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::info;

use super::domain::{
    CreditScoreAnalysis, DashboardScore, FinancialSnapshot, InvoiceFinancials, InvoiceId,
    InvoiceRecord, InvoiceStatus, InvoiceSubmission, SnapshotError,
};
use super::engine::CreditScoreEngine;
use super::narrative::NarrativeGenerator;
use super::repository::{InvoiceRepository, RepositoryError};
use crate::scoring::UserId;

/// Share of an unexplained invoice remainder attributed to tax when neither
/// tax nor extra charges were declared; the rest counts as extra charges.
const ESTIMATED_TAX_SHARE: f64 = 0.8;

static INVOICE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_invoice_id() -> InvoiceId {
    let id = INVOICE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    InvoiceId(format!("inv-{id:06}"))
}

/// Outcome of recording an invoice. Resubmitting a known invoice number is
/// not an error; the frozen record comes back flagged as a duplicate.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedInvoice {
    pub record: InvoiceRecord,
    pub duplicate: bool,
}

/// Service composing the repository and the credit score engine.
pub struct InvoiceScoringService<R, N> {
    repository: Arc<R>,
    engine: Arc<CreditScoreEngine<N>>,
}

impl<R, N> InvoiceScoringService<R, N>
where
    R: InvoiceRepository + 'static,
    N: NarrativeGenerator + 'static,
{
    pub fn new(repository: Arc<R>, engine: Arc<CreditScoreEngine<N>>) -> Self {
        Self { repository, engine }
    }

    /// Record a submitted invoice, scoring it against the user's history.
    ///
    /// The resulting score is frozen on the record and never recomputed when
    /// later invoices arrive.
    pub fn record_invoice(
        &self,
        user_id: UserId,
        submission: InvoiceSubmission,
    ) -> Result<RecordedInvoice, InvoiceServiceError> {
        validate(&submission)?;

        if let Some(existing) = self
            .repository
            .find_by_number(&user_id, &submission.invoice_number)?
        {
            info!(
                invoice_number = %submission.invoice_number,
                "invoice already recorded; returning frozen score"
            );
            return Ok(RecordedInvoice {
                record: existing,
                duplicate: true,
            });
        }

        let (tax_amount, extra_charges) = estimate_charges(&submission);
        let incoming = InvoiceFinancials {
            total_amount: submission.total_amount,
            tax_amount,
            extra_charges,
            status: InvoiceStatus::Pending,
        };

        let history: Vec<InvoiceFinancials> = self
            .repository
            .list_for_user(&user_id)?
            .iter()
            .map(InvoiceRecord::financials)
            .collect();
        let snapshot = FinancialSnapshot::with_new_invoice(&history, &incoming);
        let analysis = self.engine.score(&snapshot)?;

        let record = InvoiceRecord {
            id: next_invoice_id(),
            user_id: user_id.clone(),
            invoice_number: submission.invoice_number.clone(),
            client: submission.client,
            date: submission.date,
            total_amount: submission.total_amount,
            currency: normalize_currency(submission.currency),
            tax_amount,
            extra_charges,
            line_items: submission.line_items,
            status: InvoiceStatus::Pending,
            credit_score: analysis.final_weighted_credit_score,
            credit_score_data: analysis,
        };

        match self.repository.insert(record) {
            Ok(stored) => Ok(RecordedInvoice {
                record: stored,
                duplicate: false,
            }),
            // Lost an insert race; the winner's frozen score is authoritative.
            Err(RepositoryError::Conflict) => {
                let existing = self
                    .repository
                    .find_by_number(&user_id, &submission.invoice_number)?
                    .ok_or(RepositoryError::NotFound)?;
                Ok(RecordedInvoice {
                    record: existing,
                    duplicate: true,
                })
            }
            Err(error) => Err(error.into()),
        }
    }

    /// Score an externally assembled snapshot without persisting anything.
    pub fn score_snapshot(
        &self,
        snapshot: &FinancialSnapshot,
    ) -> Result<CreditScoreAnalysis, InvoiceServiceError> {
        Ok(self.engine.score(snapshot)?)
    }

    /// Dashboard aggregate over the user's frozen invoice scores.
    pub fn dashboard(&self, user_id: &UserId) -> Result<DashboardScore, InvoiceServiceError> {
        let records = self.repository.list_for_user(user_id)?;
        let scores: Vec<f64> = records.iter().map(|record| record.credit_score).collect();
        Ok(DashboardScore::from_scores(&scores, records.len()))
    }

    /// All stored invoices for a user, newest submission order preserved.
    pub fn invoices(&self, user_id: &UserId) -> Result<Vec<InvoiceRecord>, InvoiceServiceError> {
        Ok(self.repository.list_for_user(user_id)?)
    }
}

fn validate(submission: &InvoiceSubmission) -> Result<(), InvoiceServiceError> {
    if submission.invoice_number.trim().is_empty() {
        return Err(InvoiceServiceError::Validation(
            "invoice_number must not be empty".to_string(),
        ));
    }
    if !submission.total_amount.is_finite() || submission.total_amount <= 0.0 {
        return Err(InvoiceServiceError::Validation(
            "total_amount must be a positive amount".to_string(),
        ));
    }
    if submission.tax_amount < 0.0 || submission.extra_charges < 0.0 {
        return Err(InvoiceServiceError::Validation(
            "tax_amount and extra_charges must not be negative".to_string(),
        ));
    }
    Ok(())
}

/// When neither tax nor extra charges were declared, attribute the remainder
/// above the line-item subtotal using the documented 80/20 split.
fn estimate_charges(submission: &InvoiceSubmission) -> (f64, f64) {
    if submission.tax_amount > 0.0 || submission.extra_charges > 0.0 {
        return (submission.tax_amount, submission.extra_charges);
    }
    if submission.line_items.is_empty() {
        return (0.0, 0.0);
    }

    let subtotal: f64 = submission.line_items.iter().map(|item| item.amount).sum();
    let remainder = submission.total_amount - subtotal;
    if remainder > 0.0 {
        (
            remainder * ESTIMATED_TAX_SHARE,
            remainder * (1.0 - ESTIMATED_TAX_SHARE),
        )
    } else {
        (0.0, 0.0)
    }
}

fn normalize_currency(currency: Option<String>) -> String {
    match currency {
        Some(code) if !code.trim().is_empty() => code.trim().to_uppercase(),
        _ => "INR".to_string(),
    }
}

/// Error raised by the invoice scoring service.
#[derive(Debug, thiserror::Error)]
pub enum InvoiceServiceError {
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
