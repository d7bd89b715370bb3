use std::collections::BTreeMap;

use super::common::*;

use crate::scoring::insurance::domain::{BusinessSize, RiskFactorKind, RiskLevel};
use crate::scoring::insurance::risk::assess_risk;

fn component_score(profile: &crate::scoring::insurance::domain::RiskProfile, factor: RiskFactorKind) -> u8 {
    profile
        .components
        .iter()
        .find(|component| component.factor == factor)
        .map(|component| component.score)
        .expect("component present")
}

#[test]
fn bare_operation_scores_the_base_rate_only() {
    let assessment = crate::scoring::insurance::domain::BusinessAssessment {
        employee_count: 0,
        assets: BTreeMap::new(),
        primary_concerns: Vec::new(),
        ..retail_assessment()
    };

    let profile = assess_risk(&assessment);
    assert_eq!(profile.risk_score, 40);
    assert_eq!(profile.risk_level, RiskLevel::Low);
    assert_eq!(profile.business_size, BusinessSize::Micro);
}

#[test]
fn retail_fixture_lands_in_the_medium_band() {
    let profile = assess_risk(&retail_assessment());

    // 40 base + 18 assets + 5 workforce + 6 concerns.
    assert_eq!(profile.risk_score, 69);
    assert_eq!(profile.risk_level, RiskLevel::Medium);
    assert_eq!(profile.asset_total, 1_200_000.0);
    assert_eq!(profile.components.len(), 4);
}

#[test]
fn asset_brackets_are_strictly_exclusive_at_their_edges() {
    let mut assessment = retail_assessment();
    let cases: [(f64, u8); 7] = [
        (50_000.0, 0),
        (50_001.0, 6),
        (250_000.0, 6),
        (1_000_000.0, 12),
        (1_000_001.0, 18),
        (5_000_000.0, 18),
        (5_000_001.0, 25),
    ];
    for (total, expected) in cases {
        assessment.assets = BTreeMap::from([("premises".to_string(), total)]);
        let profile = assess_risk(&assessment);
        assert_eq!(
            component_score(&profile, RiskFactorKind::AssetExposure),
            expected,
            "asset total {total}"
        );
    }
}

#[test]
fn invalid_asset_values_are_ignored() {
    let mut assessment = retail_assessment();
    assessment.assets = BTreeMap::from([
        ("premises".to_string(), 300_000.0),
        ("bad_entry".to_string(), f64::NAN),
        ("refund".to_string(), -50_000.0),
    ]);

    let profile = assess_risk(&assessment);
    assert_eq!(profile.asset_total, 300_000.0);
    assert_eq!(component_score(&profile, RiskFactorKind::AssetExposure), 12);
}

#[test]
fn workforce_brackets_follow_headcount() {
    let mut assessment = retail_assessment();
    let cases: [(u32, u8, BusinessSize); 6] = [
        (10, 0, BusinessSize::Micro),
        (11, 5, BusinessSize::Small),
        (50, 5, BusinessSize::Small),
        (51, 10, BusinessSize::Medium),
        (200, 10, BusinessSize::Medium),
        (201, 15, BusinessSize::Medium),
    ];
    for (count, expected, size) in cases {
        assessment.employee_count = count;
        let profile = assess_risk(&assessment);
        assert_eq!(
            component_score(&profile, RiskFactorKind::WorkforceSize),
            expected,
            "headcount {count}"
        );
        assert_eq!(profile.business_size, size, "headcount {count}");
    }

    assessment.employee_count = 251;
    assert_eq!(assess_risk(&assessment).business_size, BusinessSize::Large);
}

#[test]
fn risk_score_never_decreases_as_assets_grow() {
    let mut assessment = retail_assessment();
    let mut previous = 0;
    for total in [
        0.0,
        10_000.0,
        50_001.0,
        250_001.0,
        1_000_001.0,
        5_000_001.0,
        20_000_000.0,
    ] {
        assessment.assets = BTreeMap::from([("premises".to_string(), total)]);
        let score = assess_risk(&assessment).risk_score;
        assert!(score >= previous, "asset total {total}");
        previous = score;
    }
}

#[test]
fn risk_score_never_decreases_as_headcount_grows() {
    let mut assessment = retail_assessment();
    let mut previous = 0;
    for count in [0, 5, 11, 25, 51, 120, 201, 400] {
        assessment.employee_count = count;
        let score = assess_risk(&assessment).risk_score;
        assert!(score >= previous, "headcount {count}");
        previous = score;
    }
}

#[test]
fn concern_points_cap_at_eighteen() {
    let mut assessment = retail_assessment();
    assessment.primary_concerns = (0..7).map(|n| format!("concern-{n}")).collect();

    let profile = assess_risk(&assessment);
    assert_eq!(
        component_score(&profile, RiskFactorKind::ConcernDiversity),
        18
    );
}

#[test]
fn duplicate_and_blank_concerns_collapse() {
    let mut assessment = retail_assessment();
    assessment.primary_concerns = vec![
        "Fire".to_string(),
        " fire ".to_string(),
        "theft".to_string(),
        "   ".to_string(),
    ];

    let profile = assess_risk(&assessment);
    assert_eq!(
        component_score(&profile, RiskFactorKind::ConcernDiversity),
        6
    );
}

#[test]
fn score_never_exceeds_one_hundred() {
    let mut assessment = retail_assessment();
    assessment.employee_count = 500;
    assessment.assets = BTreeMap::from([("plant".to_string(), 20_000_000.0)]);
    assessment.primary_concerns = (0..10).map(|n| format!("concern-{n}")).collect();

    let profile = assess_risk(&assessment);
    assert!(profile.risk_score <= 100);
    assert_eq!(profile.risk_score, 98);
    assert_eq!(profile.risk_level, RiskLevel::High);
}

#[test]
fn risk_level_boundaries_are_inclusive() {
    assert_eq!(RiskLevel::for_score(49), RiskLevel::Low);
    assert_eq!(RiskLevel::for_score(50), RiskLevel::Elevated);
    assert_eq!(RiskLevel::for_score(64), RiskLevel::Elevated);
    assert_eq!(RiskLevel::for_score(65), RiskLevel::Medium);
    assert_eq!(RiskLevel::for_score(79), RiskLevel::Medium);
    assert_eq!(RiskLevel::for_score(80), RiskLevel::High);
}
