use std::collections::BTreeMap;

use super::domain::{
    DetailedAnalysis, FactorBreakdown, FactorKind, FinancialSnapshot, RecommendationPlan,
    ScoreCategory,
};

/// Individual score at or above this reads as a strength.
const STRENGTH_THRESHOLD: f64 = 80.0;
/// Individual score at or below this reads as a weakness.
const WEAKNESS_THRESHOLD: f64 = 50.0;

/// Inputs available to a narrative generator for one scoring run.
pub struct NarrativeContext<'a> {
    pub snapshot: &'a FinancialSnapshot,
    pub factor_breakdown: &'a BTreeMap<FactorKind, FactorBreakdown>,
    pub final_score: f64,
    pub category: ScoreCategory,
}

/// Prose sections of an analysis, produced separately from the numeric score.
#[derive(Debug, Clone, PartialEq)]
pub struct Narrative {
    pub detailed_analysis: DetailedAnalysis,
    pub recommendations: RecommendationPlan,
}

impl Narrative {
    /// Placeholder narrative used when generation fails. The numeric score is
    /// always kept; only the prose degrades.
    pub fn fallback() -> Self {
        Self {
            detailed_analysis: DetailedAnalysis {
                strengths: Vec::new(),
                weaknesses: Vec::new(),
                risk_assessment: "Narrative analysis unavailable; numeric score retained."
                    .to_string(),
                creditworthiness_summary: Vec::new(),
            },
            recommendations: RecommendationPlan::default(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum NarrativeError {
    #[error("narrative generator unavailable: {0}")]
    Unavailable(String),
}

/// Strategy seam for producing the prose sections of an analysis.
pub trait NarrativeGenerator: Send + Sync {
    fn narrate(&self, context: &NarrativeContext<'_>) -> Result<Narrative, NarrativeError>;
}

/// Deterministic narrative built from factor scores alone. Serves as the
/// default generator and as the reference behavior for external ones.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedNarrative;

impl NarrativeGenerator for RuleBasedNarrative {
    fn narrate(&self, context: &NarrativeContext<'_>) -> Result<Narrative, NarrativeError> {
        let mut strengths = Vec::new();
        let mut weaknesses = Vec::new();
        for (factor, breakdown) in context.factor_breakdown {
            if breakdown.individual_score >= STRENGTH_THRESHOLD {
                strengths.push(format!(
                    "Strong {}: {}",
                    factor.label(),
                    breakdown.comment
                ));
            } else if breakdown.individual_score <= WEAKNESS_THRESHOLD {
                weaknesses.push(format!("Weak {}: {}", factor.label(), breakdown.comment));
            }
        }

        let risk_assessment = match context.category {
            ScoreCategory::Excellent => {
                "Low credit risk. Payment behavior and compliance are consistently strong."
            }
            ScoreCategory::Good => {
                "Moderate-low credit risk. Fundamentals are sound with minor gaps to close."
            }
            ScoreCategory::Fair => {
                "Moderate credit risk. Cash collection or compliance needs active attention."
            }
            ScoreCategory::Poor => {
                "Elevated credit risk. Payment discipline requires immediate remediation."
            }
        }
        .to_string();

        let creditworthiness_summary = vec![
            format!(
                "Weighted credit score of {:.2} places this business in the {} band.",
                context.final_score,
                context.category.label()
            ),
            format!(
                "Assessment covers {} invoices totalling {:.2}.",
                context.snapshot.no_of_invoices, context.snapshot.total_amount
            ),
        ];

        let recommendations = build_recommendations(context);

        Ok(Narrative {
            detailed_analysis: DetailedAnalysis {
                strengths,
                weaknesses,
                risk_assessment,
                creditworthiness_summary,
            },
            recommendations,
        })
    }
}

fn build_recommendations(context: &NarrativeContext<'_>) -> RecommendationPlan {
    let mut immediate_actions = Vec::new();
    let mut long_term_improvements = Vec::new();
    let mut priority_focus_areas = Vec::new();

    // Weakest factors first so priority areas line up with the lowest scores.
    let mut ranked: Vec<(&FactorKind, &FactorBreakdown)> =
        context.factor_breakdown.iter().collect();
    ranked.sort_by(|a, b| {
        a.1.individual_score
            .partial_cmp(&b.1.individual_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    for (factor, breakdown) in &ranked {
        if breakdown.individual_score > WEAKNESS_THRESHOLD {
            continue;
        }
        priority_focus_areas.push(factor.label().to_string());
        match factor {
            FactorKind::PaymentCompletionRate => {
                immediate_actions
                    .push("Follow up on overdue invoices and tighten payment terms.".to_string());
                long_term_improvements.push(
                    "Introduce milestone billing so receivables settle earlier.".to_string(),
                );
            }
            FactorKind::PaidToPendingRatio => {
                immediate_actions
                    .push("Prioritize collection of the largest pending invoices.".to_string());
                long_term_improvements.push(
                    "Offer early-payment incentives to shrink the pending backlog.".to_string(),
                );
            }
            FactorKind::TaxCompliance => {
                immediate_actions
                    .push("Reconcile declared tax against invoiced value this cycle.".to_string());
                long_term_improvements
                    .push("Automate GST computation at invoice creation.".to_string());
            }
            FactorKind::ExtraChargesManagement => {
                immediate_actions
                    .push("Audit recent extra charges and justify or remove them.".to_string());
                long_term_improvements.push(
                    "Fold recurring surcharges into base pricing to keep invoices clean."
                        .to_string(),
                );
            }
        }
    }

    if priority_focus_areas.is_empty() {
        long_term_improvements
            .push("Maintain current invoicing discipline to preserve the score.".to_string());
        priority_focus_areas.push("consistency".to_string());
    }

    RecommendationPlan {
        immediate_actions,
        long_term_improvements,
        priority_focus_areas,
    }
}
