//! Invoice-backed credit scoring.
//!
//! Invoices are uploaded one at a time; each upload is scored against the
//! user's full history and the result is frozen on the record. The dashboard
//! view averages those frozen scores rather than rescoring anything.

pub mod domain;
pub mod engine;
pub mod narrative;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{
    CreditScoreAnalysis, DashboardScore, DetailedAnalysis, FactorBreakdown, FactorKind,
    FinancialSnapshot, InvoiceFinancials, InvoiceId, InvoiceRecord, InvoiceStatus,
    InvoiceSubmission, LineItem, RecommendationPlan, ScoreCategory, SnapshotError,
};
pub use engine::{CreditScoreEngine, ScoringWeights};
pub use narrative::{
    Narrative, NarrativeContext, NarrativeError, NarrativeGenerator, RuleBasedNarrative,
};
pub use repository::{InvoiceRepository, RepositoryError};
pub use router::credit_router;
pub use service::{InvoiceScoringService, InvoiceServiceError, RecordedInvoice};

#[cfg(test)]
mod tests;
