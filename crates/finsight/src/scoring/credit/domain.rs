use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::scoring::UserId;

/// Identifier wrapper for stored invoices.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InvoiceId(pub String);

/// Settlement state of a stored invoice; mutated externally, never by scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Pending,
    Paid,
}

impl InvoiceStatus {
    pub const fn label(self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Paid => "paid",
        }
    }
}

/// Line item as extracted from an uploaded invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    pub amount: f64,
}

/// Invoice payload submitted for scoring; extraction happens upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceSubmission {
    pub invoice_number: String,
    pub client: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub payment_terms: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    pub total_amount: f64,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub tax_amount: f64,
    #[serde(default)]
    pub extra_charges: f64,
    #[serde(default)]
    pub line_items: Vec<LineItem>,
}

/// Minimal financial view of a stored invoice used to build snapshots.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvoiceFinancials {
    pub total_amount: f64,
    pub tax_amount: f64,
    pub extra_charges: f64,
    pub status: InvoiceStatus,
}

/// Stored invoice row with its frozen point-in-time credit score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    pub id: InvoiceId,
    pub user_id: UserId,
    pub invoice_number: String,
    pub client: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    pub total_amount: f64,
    pub currency: String,
    pub tax_amount: f64,
    pub extra_charges: f64,
    pub line_items: Vec<LineItem>,
    pub status: InvoiceStatus,
    pub credit_score: f64,
    pub credit_score_data: CreditScoreAnalysis,
}

impl InvoiceRecord {
    pub fn financials(&self) -> InvoiceFinancials {
        InvoiceFinancials {
            total_amount: self.total_amount,
            tax_amount: self.tax_amount,
            extra_charges: self.extra_charges,
            status: self.status,
        }
    }
}

/// Neutral completion rate assumed when there is no invoiced volume to divide by.
pub const DEFAULT_COMPLETION_RATE: f64 = 0.7;
/// Neutral paid-to-pending ratio substituted when nothing is pending.
pub const NEUTRAL_PAID_TO_PENDING: f64 = 2.33;
/// Optimistic completion rate granted to users with no invoice history.
pub const NEW_USER_COMPLETION_RATE: f64 = 0.8;

/// Aggregate of a user's invoice history fed to the credit score engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialSnapshot {
    pub no_of_invoices: u32,
    pub total_amount: f64,
    pub total_amount_pending: f64,
    pub total_amount_paid: f64,
    pub tax: f64,
    pub extra_charges: f64,
    pub payment_completion_rate: f64,
    pub paid_to_pending_ratio: f64,
}

impl FinancialSnapshot {
    /// Aggregate stored history plus one new, still-pending invoice.
    ///
    /// With no history the optimistic new-user defaults apply so a first
    /// upload is not scored punitively.
    pub fn with_new_invoice(history: &[InvoiceFinancials], incoming: &InvoiceFinancials) -> Self {
        let no_of_invoices = history.len() as u32 + 1;
        let total_amount: f64 =
            history.iter().map(|inv| inv.total_amount).sum::<f64>() + incoming.total_amount;
        let tax: f64 = history.iter().map(|inv| inv.tax_amount).sum::<f64>() + incoming.tax_amount;
        let extra_charges: f64 =
            history.iter().map(|inv| inv.extra_charges).sum::<f64>() + incoming.extra_charges;

        let total_amount_paid: f64 = history
            .iter()
            .filter(|inv| inv.status == InvoiceStatus::Paid)
            .map(|inv| inv.total_amount)
            .sum();
        let total_amount_pending = (total_amount - total_amount_paid).max(0.0);

        let payment_completion_rate = if history.is_empty() {
            NEW_USER_COMPLETION_RATE
        } else {
            let paid_count = history
                .iter()
                .filter(|inv| inv.status == InvoiceStatus::Paid)
                .count();
            paid_count as f64 / no_of_invoices as f64
        };

        // A lone first invoice is always pending; computing the ratio there
        // would zero out a quarter of the weighted score for every new user.
        let paid_to_pending_ratio = if history.is_empty() || total_amount_pending <= 0.0 {
            NEUTRAL_PAID_TO_PENDING
        } else {
            total_amount_paid / total_amount_pending
        };

        Self {
            no_of_invoices,
            total_amount,
            total_amount_pending,
            total_amount_paid,
            tax,
            extra_charges,
            payment_completion_rate,
            paid_to_pending_ratio,
        }
    }

    pub fn first_invoice(incoming: &InvoiceFinancials) -> Self {
        Self::with_new_invoice(&[], incoming)
    }
}

/// Snapshot-level validation failures surfaced before any scoring runs.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("snapshot must cover at least one invoice")]
    NoInvoices,
    #[error(
        "pending {pending} + paid {paid} does not reconcile with total {total} beyond tolerance"
    )]
    Unreconciled { total: f64, pending: f64, paid: f64 },
}

/// Recognized scoring factors; serialized names are part of the API contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorKind {
    PaymentCompletionRate,
    PaidToPendingRatio,
    TaxCompliance,
    ExtraChargesManagement,
}

impl FactorKind {
    pub const fn label(self) -> &'static str {
        match self {
            FactorKind::PaymentCompletionRate => "payment completion rate",
            FactorKind::PaidToPendingRatio => "paid-to-pending ratio",
            FactorKind::TaxCompliance => "tax compliance",
            FactorKind::ExtraChargesManagement => "extra charges management",
        }
    }
}

/// Per-factor contribution to the weighted credit score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorBreakdown {
    pub actual_value: f64,
    pub individual_score: f64,
    pub weighted_score: f64,
    pub weight_percentage: u8,
    pub comment: String,
}

/// Narrative sections describing the score in plain language.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetailedAnalysis {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub risk_assessment: String,
    pub creditworthiness_summary: Vec<String>,
}

/// Actionable guidance attached to every analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendationPlan {
    pub immediate_actions: Vec<String>,
    pub long_term_improvements: Vec<String>,
    pub priority_focus_areas: Vec<String>,
}

/// Category buckets applied to both per-invoice and dashboard scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreCategory {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl ScoreCategory {
    pub fn for_score(score: f64) -> Self {
        if score >= 80.0 {
            ScoreCategory::Excellent
        } else if score >= 70.0 {
            ScoreCategory::Good
        } else if score >= 60.0 {
            ScoreCategory::Fair
        } else {
            ScoreCategory::Poor
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ScoreCategory::Excellent => "Excellent",
            ScoreCategory::Good => "Good",
            ScoreCategory::Fair => "Fair",
            ScoreCategory::Poor => "Poor",
        }
    }
}

/// Complete scoring output; persisted verbatim on the owning invoice record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditScoreAnalysis {
    pub final_weighted_credit_score: f64,
    pub score_category: ScoreCategory,
    pub factor_breakdown: BTreeMap<FactorKind, FactorBreakdown>,
    pub detailed_analysis: DetailedAnalysis,
    pub recommendations: RecommendationPlan,
}

/// Aggregate dashboard view: the arithmetic mean of stored invoice scores.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardScore {
    pub credit_score: f64,
    pub category: &'static str,
    pub total_invoices: usize,
}

impl DashboardScore {
    pub fn from_scores(scores: &[f64], total_invoices: usize) -> Self {
        if scores.is_empty() {
            return Self {
                credit_score: 0.0,
                category: "No Data",
                total_invoices,
            };
        }

        let mean = scores.iter().sum::<f64>() / scores.len() as f64;
        let rounded = (mean * 10.0).round() / 10.0;
        Self {
            credit_score: rounded,
            category: ScoreCategory::for_score(mean).label(),
            total_invoices,
        }
    }
}
