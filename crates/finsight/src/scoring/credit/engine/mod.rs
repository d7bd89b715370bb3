mod factors;

use tracing::warn;

use super::domain::{CreditScoreAnalysis, FinancialSnapshot, ScoreCategory, SnapshotError};
use super::narrative::{Narrative, NarrativeContext, NarrativeGenerator};

/// Weight assigned to each scoring factor, in percent. Must sum to 100.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringWeights {
    pub payment_completion: u8,
    pub paid_to_pending: u8,
    pub tax_compliance: u8,
    pub extra_charges: u8,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            payment_completion: 40,
            paid_to_pending: 25,
            tax_compliance: 20,
            extra_charges: 15,
        }
    }
}

/// Stateless engine turning a financial snapshot into a weighted analysis.
pub struct CreditScoreEngine<N> {
    weights: ScoringWeights,
    narrator: N,
}

impl<N> CreditScoreEngine<N>
where
    N: NarrativeGenerator,
{
    pub fn new(weights: ScoringWeights, narrator: N) -> Self {
        Self { weights, narrator }
    }

    /// Score a snapshot. Degenerate numeric inputs are replaced with the
    /// documented neutral defaults; only an irreconcilable snapshot errors.
    pub fn score(&self, snapshot: &FinancialSnapshot) -> Result<CreditScoreAnalysis, SnapshotError> {
        let snapshot = reconcile(snapshot)?;

        let (factor_breakdown, raw_score) = factors::score_factors(&snapshot, &self.weights);
        let final_weighted_credit_score = round2(raw_score.clamp(0.0, 100.0));
        let score_category = ScoreCategory::for_score(final_weighted_credit_score);

        let context = NarrativeContext {
            snapshot: &snapshot,
            factor_breakdown: &factor_breakdown,
            final_score: final_weighted_credit_score,
            category: score_category,
        };
        let narrative = match self.narrator.narrate(&context) {
            Ok(narrative) => narrative,
            Err(error) => {
                warn!(%error, "narrative generation failed; using fallback");
                Narrative::fallback()
            }
        };

        Ok(CreditScoreAnalysis {
            final_weighted_credit_score,
            score_category,
            factor_breakdown,
            detailed_analysis: narrative.detailed_analysis,
            recommendations: narrative.recommendations,
        })
    }
}

/// Correct small pending/paid drift against the reported total; reject large
/// mismatches before any factor math runs.
fn reconcile(snapshot: &FinancialSnapshot) -> Result<FinancialSnapshot, SnapshotError> {
    if snapshot.no_of_invoices == 0 {
        return Err(SnapshotError::NoInvoices);
    }

    let settled = snapshot.total_amount_pending + snapshot.total_amount_paid;
    let drift = (settled - snapshot.total_amount).abs();
    let tolerance = (snapshot.total_amount.abs() * 0.01).max(0.01);
    if drift <= tolerance {
        let mut corrected = snapshot.clone();
        corrected.total_amount = settled;
        Ok(corrected)
    } else {
        Err(SnapshotError::Unreconciled {
            total: snapshot.total_amount,
            pending: snapshot.total_amount_pending,
            paid: snapshot.total_amount_paid,
        })
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
