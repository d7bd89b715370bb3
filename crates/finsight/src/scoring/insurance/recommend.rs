use super::domain::{
    BusinessAssessment, BusinessSize, InsuranceTemplate, PriorityRisk, Recommendation, RiskProfile,
};
use super::risk::distinct_concerns;

/// Premium divisor: a risk score of 100 raises premiums by half.
const PREMIUM_RISK_DIVISOR: f64 = 200.0;
/// Coverage scaling headroom over the product ceiling.
const COVERAGE_HEADROOM: f64 = 1.2;
/// Premium loading applied to the fallback baseline offer.
const FALLBACK_PREMIUM_LOADING: f64 = 1.1;

const FALLBACK_REASON: &str =
    "Core policy offered as a baseline recommendation (no direct risk match found)";

/// Rank catalog products for an assessed business, best match first.
///
/// Products that do not serve the business type are skipped entirely. When no
/// product qualifies but the catalog has entries, the first product comes back
/// as a baseline offer so the caller never ends up empty-handed by accident.
pub fn recommend(
    catalog: &[InsuranceTemplate],
    assessment: &BusinessAssessment,
    profile: &RiskProfile,
) -> Vec<Recommendation> {
    let business_type = assessment.business_type.trim().to_lowercase();
    let concerns = distinct_concerns(&assessment.primary_concerns);
    let focus = assessment
        .preferences
        .focus
        .as_deref()
        .map(|focus| focus.trim().to_lowercase());

    let mut ranked: Vec<Recommendation> = Vec::new();
    for template in catalog {
        let serves_type = template
            .business_types
            .iter()
            .any(|candidate| candidate.trim().to_lowercase() == business_type);
        if !serves_type {
            continue;
        }

        let mut risk_match: Vec<String> = template
            .risk_tags
            .iter()
            .map(|tag| tag.trim().to_lowercase())
            .filter(|tag| concerns.contains(tag))
            .collect();
        risk_match.sort();

        let coverage_estimate = scale_coverage(template, profile.asset_total);
        let premium_estimate = round2(
            template.base_premium * (1.0 + profile.risk_score as f64 / PREMIUM_RISK_DIVISOR),
        );

        let mut match_score = risk_match.len() as u32 * 10 + 15;
        if matches!(
            profile.business_size,
            BusinessSize::Small | BusinessSize::Medium
        ) {
            match_score += 5;
        }
        if let Some(focus) = &focus {
            if template
                .risk_tags
                .iter()
                .any(|tag| tag.trim().to_lowercase() == *focus)
            {
                match_score += 3;
            }
        }

        let coverage_part = if risk_match.is_empty() {
            "broad foundational cover relevant to your sector".to_string()
        } else {
            format!("covers key risks: {}", risk_match.join(", "))
        };
        let reason = [
            coverage_part,
            format!("scaled coverage ≈ ₹{coverage_estimate:.0}"),
            format!(
                "risk score {} ({})",
                profile.risk_score,
                profile.risk_level.label()
            ),
            format!("business size {}", profile.business_size.label()),
        ]
        .join("; ");

        ranked.push(Recommendation {
            policy_name: template.name.clone(),
            policy_type: template.policy_type.clone(),
            provider: template.provider.clone(),
            match_score,
            coverage_estimate,
            coverage_range: rupee_range(template.coverage_min, template.coverage_max),
            premium_estimate,
            premium_range: rupee_range(premium_estimate * 0.9, premium_estimate * 1.2),
            compliance_badge: compliance_badge(template),
            risk_match,
            reason,
            features: template.features.clone(),
            description: template.description.clone(),
        });
    }

    ranked.sort_by(|a, b| b.match_score.cmp(&a.match_score));

    if ranked.is_empty() {
        if let Some(template) = catalog.first() {
            ranked.push(baseline_offer(template, profile));
        }
    }

    ranked
}

fn baseline_offer(template: &InsuranceTemplate, profile: &RiskProfile) -> Recommendation {
    let premium_estimate = round2(template.base_premium * FALLBACK_PREMIUM_LOADING);
    Recommendation {
        policy_name: template.name.clone(),
        policy_type: template.policy_type.clone(),
        provider: template.provider.clone(),
        match_score: 0,
        coverage_estimate: scale_coverage(template, profile.asset_total),
        coverage_range: rupee_range(template.coverage_min, template.coverage_max),
        premium_estimate,
        premium_range: rupee_range(premium_estimate * 0.9, premium_estimate * 1.2),
        compliance_badge: compliance_badge(template),
        risk_match: Vec::new(),
        reason: FALLBACK_REASON.to_string(),
        features: template.features.clone(),
        description: template.description.clone(),
    }
}

/// Interpolate a coverage figure between product floor and ceiling based on
/// how the asset base compares to the ceiling plus headroom.
fn scale_coverage(template: &InsuranceTemplate, asset_total: f64) -> f64 {
    if template.coverage_max > template.coverage_min {
        let position = (asset_total / (template.coverage_max * COVERAGE_HEADROOM)).min(1.0);
        template.coverage_min + position * (template.coverage_max - template.coverage_min)
    } else {
        template.coverage_min
    }
}

fn compliance_badge(template: &InsuranceTemplate) -> String {
    if template.legal_compliance {
        format!("{} Approved", template.regulatory_authority)
    } else {
        "Review Required".to_string()
    }
}

fn rupee_range(low: f64, high: f64) -> String {
    format!("₹{} - ₹{}", low as i64, high as i64)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Severity attached to a recognized concern; anything unrecognized still
/// registers with the lowest weight.
fn concern_severity(concern: &str) -> u8 {
    match concern {
        "fire" => 10,
        "cyber" => 9,
        "natural_disasters" => 9,
        "liability" => 8,
        "theft" => 7,
        "employee_welfare" => 6,
        "transport" => 5,
        _ => 1,
    }
}

/// Top three declared concerns ranked by severity.
pub fn priority_risks(concerns: &[String]) -> Vec<PriorityRisk> {
    let mut ranked: Vec<PriorityRisk> = distinct_concerns(concerns)
        .into_iter()
        .map(|concern| PriorityRisk {
            severity: concern_severity(&concern),
            concern,
        })
        .collect();
    ranked.sort_by(|a, b| b.severity.cmp(&a.severity).then(a.concern.cmp(&b.concern)));
    ranked.truncate(3);
    ranked
}
