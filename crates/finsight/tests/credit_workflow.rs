use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use finsight::scoring::credit::{
    CreditScoreEngine, InvoiceId, InvoiceRecord, InvoiceRepository, InvoiceScoringService,
    InvoiceSubmission, LineItem, RepositoryError, RuleBasedNarrative, ScoreCategory,
    ScoringWeights,
};
use finsight::scoring::UserId;

#[derive(Default, Clone)]
struct MemoryRepository {
    records: Arc<Mutex<HashMap<InvoiceId, InvoiceRecord>>>,
}

impl InvoiceRepository for MemoryRepository {
    fn insert(&self, record: InvoiceRecord) -> Result<InvoiceRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let duplicate = guard.values().any(|row| {
            row.user_id == record.user_id && row.invoice_number == record.invoice_number
        });
        if duplicate {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn find_by_number(
        &self,
        user_id: &UserId,
        invoice_number: &str,
    ) -> Result<Option<InvoiceRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .find(|row| &row.user_id == user_id && row.invoice_number == invoice_number)
            .cloned())
    }

    fn fetch(&self, id: &InvoiceId) -> Result<Option<InvoiceRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list_for_user(&self, user_id: &UserId) -> Result<Vec<InvoiceRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut rows: Vec<InvoiceRecord> = guard
            .values()
            .filter(|row| &row.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.id.0.cmp(&b.id.0));
        Ok(rows)
    }
}

fn service() -> InvoiceScoringService<MemoryRepository, RuleBasedNarrative> {
    InvoiceScoringService::new(
        Arc::new(MemoryRepository::default()),
        Arc::new(CreditScoreEngine::new(
            ScoringWeights::default(),
            RuleBasedNarrative,
        )),
    )
}

fn submission(invoice_number: &str, total_amount: f64, tax_amount: f64) -> InvoiceSubmission {
    InvoiceSubmission {
        invoice_number: invoice_number.to_string(),
        client: "Meridian Traders".to_string(),
        date: None,
        payment_terms: Some("NET 30".to_string()),
        industry: Some("retail".to_string()),
        total_amount,
        currency: None,
        tax_amount,
        extra_charges: 0.0,
        line_items: Vec::new(),
    }
}

#[test]
fn upload_score_and_dashboard_round_trip() {
    let service = service();
    let user = UserId("msme-1".to_string());

    let first = service
        .record_invoice(user.clone(), submission("INV-1", 10_000.0, 1_000.0))
        .expect("first invoice records");
    assert!(!first.duplicate);
    // New-user defaults: 0.8 completion and the 2.33 neutral ratio.
    assert_eq!(first.record.credit_score, 81.56);
    assert_eq!(
        first.record.credit_score_data.score_category,
        ScoreCategory::Excellent
    );
    assert!(!first
        .record
        .credit_score_data
        .detailed_analysis
        .risk_assessment
        .is_empty());

    let second = service
        .record_invoice(user.clone(), submission("INV-2", 20_000.0, 2_000.0))
        .expect("second invoice records");
    assert!(!second.duplicate);
    assert_ne!(second.record.id, first.record.id);

    // The first invoice keeps its frozen score.
    let invoices = service.invoices(&user).expect("lists");
    assert_eq!(invoices.len(), 2);
    assert_eq!(invoices[0].credit_score, 81.56);

    let dashboard = service.dashboard(&user).expect("dashboard");
    assert_eq!(dashboard.total_invoices, 2);
    let expected =
        ((first.record.credit_score + second.record.credit_score) / 2.0 * 10.0).round() / 10.0;
    assert_eq!(dashboard.credit_score, expected);
}

#[test]
fn duplicate_uploads_are_idempotent_end_to_end() {
    let service = service();
    let user = UserId("msme-2".to_string());

    let first = service
        .record_invoice(user.clone(), submission("INV-DUP", 10_000.0, 1_000.0))
        .expect("records");
    let again = service
        .record_invoice(user.clone(), submission("INV-DUP", 77_777.0, 0.0))
        .expect("idempotent");

    assert!(again.duplicate);
    assert_eq!(again.record.id, first.record.id);
    assert_eq!(
        service.dashboard(&user).expect("dashboard").total_invoices,
        1
    );
}

#[test]
fn line_item_estimation_feeds_the_stored_record() {
    let service = service();
    let user = UserId("msme-3".to_string());

    let mut submission = submission("INV-LI", 10_000.0, 0.0);
    submission.line_items = vec![
        LineItem {
            description: "Services rendered".to_string(),
            amount: 7_000.0,
        },
        LineItem {
            description: "Materials".to_string(),
            amount: 2_000.0,
        },
    ];

    let recorded = service
        .record_invoice(user, submission)
        .expect("records");
    assert!((recorded.record.tax_amount - 800.0).abs() < 1e-9);
    assert!((recorded.record.extra_charges - 200.0).abs() < 1e-9);
}
