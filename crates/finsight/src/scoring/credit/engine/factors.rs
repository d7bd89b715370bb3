use std::collections::BTreeMap;

use super::ScoringWeights;
use crate::scoring::credit::domain::{
    FactorBreakdown, FactorKind, FinancialSnapshot, DEFAULT_COMPLETION_RATE,
    NEUTRAL_PAID_TO_PENDING,
};

/// Paid-to-pending ratio treated as fully healthy; anything above scores 100.
const HEALTHY_PAID_TO_PENDING: f64 = 4.0;
/// Tax share of invoiced value considered ordinary for MSME billing.
const ORDINARY_TAX_SHARE: f64 = 0.30;

pub(crate) fn score_factors(
    snapshot: &FinancialSnapshot,
    weights: &ScoringWeights,
) -> (BTreeMap<FactorKind, FactorBreakdown>, f64) {
    let mut breakdown = BTreeMap::new();

    let completion_rate = if snapshot.total_amount <= 0.0 {
        DEFAULT_COMPLETION_RATE
    } else {
        snapshot.payment_completion_rate.clamp(0.0, 1.0)
    };
    let completion_score = completion_rate * 100.0;
    insert_factor(
        &mut breakdown,
        FactorKind::PaymentCompletionRate,
        completion_rate,
        completion_score,
        weights.payment_completion,
        format!(
            "{:.0}% of invoiced value settled on time",
            completion_rate * 100.0
        ),
    );

    let paid_to_pending = if snapshot.total_amount_pending <= 0.0
        || !snapshot.paid_to_pending_ratio.is_finite()
    {
        NEUTRAL_PAID_TO_PENDING
    } else {
        snapshot.paid_to_pending_ratio.max(0.0)
    };
    let ratio_score = (paid_to_pending / HEALTHY_PAID_TO_PENDING).min(1.0) * 100.0;
    insert_factor(
        &mut breakdown,
        FactorKind::PaidToPendingRatio,
        paid_to_pending,
        ratio_score,
        weights.paid_to_pending,
        format!(
            "paid amounts stand at {:.2}x the pending backlog",
            paid_to_pending
        ),
    );

    let tax_share = if snapshot.total_amount > 0.0 {
        snapshot.tax / snapshot.total_amount
    } else {
        0.0
    };
    let tax_score = if snapshot.total_amount <= 0.0 {
        70.0
    } else if tax_share <= 0.0 {
        50.0
    } else if tax_share <= ORDINARY_TAX_SHARE {
        100.0
    } else {
        (100.0 - (tax_share - ORDINARY_TAX_SHARE) * 200.0).max(40.0)
    };
    insert_factor(
        &mut breakdown,
        FactorKind::TaxCompliance,
        tax_share,
        tax_score,
        weights.tax_compliance,
        format!("declared tax equals {:.1}% of invoiced value", tax_share * 100.0),
    );

    let extra_share = if snapshot.total_amount > 0.0 {
        snapshot.extra_charges / snapshot.total_amount
    } else {
        0.0
    };
    let extra_score = if snapshot.total_amount <= 0.0 {
        70.0
    } else {
        (100.0 - extra_share * 250.0).clamp(0.0, 100.0)
    };
    insert_factor(
        &mut breakdown,
        FactorKind::ExtraChargesManagement,
        extra_share,
        extra_score,
        weights.extra_charges,
        format!(
            "extra charges amount to {:.1}% of invoiced value",
            extra_share * 100.0
        ),
    );

    let final_score: f64 = breakdown.values().map(|factor| factor.weighted_score).sum();

    (breakdown, final_score)
}

fn insert_factor(
    breakdown: &mut BTreeMap<FactorKind, FactorBreakdown>,
    factor: FactorKind,
    actual_value: f64,
    individual_score: f64,
    weight_percentage: u8,
    comment: String,
) {
    let weighted_score = individual_score * weight_percentage as f64 / 100.0;
    breakdown.insert(
        factor,
        FactorBreakdown {
            actual_value,
            individual_score,
            weighted_score,
            weight_percentage,
            comment,
        },
    );
}
