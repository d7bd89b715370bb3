use std::collections::BTreeSet;

use super::domain::{
    BusinessAssessment, BusinessSize, RiskComponent, RiskFactorKind, RiskLevel, RiskProfile,
};

/// Baseline exposure every operating MSME carries.
const BASE_RISK: u8 = 40;
/// Points added per distinct declared concern.
const CONCERN_WEIGHT: u32 = 3;
/// Ceiling on the concern-diversity contribution.
const CONCERN_CAP: u32 = 18;

/// Derive the composite risk profile for a submitted assessment.
///
/// The score is additive over four components and clamped to 0..=100. Asset
/// values that are non-finite or non-positive are ignored rather than
/// rejected so one bad line does not sink the whole submission.
pub fn assess_risk(assessment: &BusinessAssessment) -> RiskProfile {
    let asset_total: f64 = assessment
        .assets
        .values()
        .copied()
        .filter(|value| value.is_finite() && *value > 0.0)
        .sum();
    let business_size = BusinessSize::for_employee_count(assessment.employee_count);

    let mut components = vec![RiskComponent {
        factor: RiskFactorKind::BaseRate,
        score: BASE_RISK,
        notes: "baseline exposure for an operating business".to_string(),
    }];

    let asset_points: u8 = if asset_total > 5_000_000.0 {
        25
    } else if asset_total > 1_000_000.0 {
        18
    } else if asset_total > 250_000.0 {
        12
    } else if asset_total > 50_000.0 {
        6
    } else {
        0
    };
    components.push(RiskComponent {
        factor: RiskFactorKind::AssetExposure,
        score: asset_points,
        notes: format!("declared assets total ₹{asset_total:.0}"),
    });

    let workforce_points: u8 = if assessment.employee_count > 200 {
        15
    } else if assessment.employee_count > 50 {
        10
    } else if assessment.employee_count > 10 {
        5
    } else {
        0
    };
    components.push(RiskComponent {
        factor: RiskFactorKind::WorkforceSize,
        score: workforce_points,
        notes: format!(
            "{} employees place the business in the {} bracket",
            assessment.employee_count,
            business_size.label()
        ),
    });

    let distinct_concerns = distinct_concerns(&assessment.primary_concerns);
    let concern_points = (distinct_concerns.len() as u32 * CONCERN_WEIGHT).min(CONCERN_CAP) as u8;
    components.push(RiskComponent {
        factor: RiskFactorKind::ConcernDiversity,
        score: concern_points,
        notes: format!("{} distinct risk concerns declared", distinct_concerns.len()),
    });

    let raw: u32 = components
        .iter()
        .map(|component| component.score as u32)
        .sum();
    let risk_score = raw.min(100) as u8;

    RiskProfile {
        risk_score,
        risk_level: RiskLevel::for_score(risk_score),
        asset_total,
        business_size,
        components,
    }
}

/// Normalized, deduplicated view of declared concerns.
pub(crate) fn distinct_concerns(concerns: &[String]) -> BTreeSet<String> {
    concerns
        .iter()
        .map(|concern| concern.trim().to_lowercase())
        .filter(|concern| !concern.is_empty())
        .collect()
}
