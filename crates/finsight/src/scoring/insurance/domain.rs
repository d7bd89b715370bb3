use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::scoring::UserId;

/// Identifier wrapper for stored assessments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssessmentId(pub String);

/// Identifier wrapper for tracked policies.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PolicyId(pub String);

/// Optional steering hints attached to an assessment submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssessmentPreferences {
    /// Risk area the owner cares most about, matched against policy risk tags.
    #[serde(default)]
    pub focus: Option<String>,
    /// Declared budget appetite; captured for analytics, not used in ranking.
    #[serde(default)]
    pub budget_level: Option<String>,
}

/// Self-reported business profile submitted for insurance risk assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessAssessment {
    pub business_type: String,
    #[serde(default)]
    pub industry: Option<String>,
    pub employee_count: u32,
    /// Declared asset values by category, in rupees.
    #[serde(default)]
    pub assets: BTreeMap<String, f64>,
    #[serde(default)]
    pub primary_concerns: Vec<String>,
    #[serde(default)]
    pub preferences: AssessmentPreferences,
}

/// Risk bands applied to the 0..=100 composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Elevated,
    Medium,
    High,
}

impl RiskLevel {
    pub fn for_score(score: u8) -> Self {
        if score >= 80 {
            RiskLevel::High
        } else if score >= 65 {
            RiskLevel::Medium
        } else if score >= 50 {
            RiskLevel::Elevated
        } else {
            RiskLevel::Low
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Elevated => "Elevated",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}

/// Size buckets derived from headcount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusinessSize {
    Micro,
    Small,
    Medium,
    Large,
}

impl BusinessSize {
    pub fn for_employee_count(count: u32) -> Self {
        if count <= 10 {
            BusinessSize::Micro
        } else if count <= 50 {
            BusinessSize::Small
        } else if count <= 250 {
            BusinessSize::Medium
        } else {
            BusinessSize::Large
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            BusinessSize::Micro => "micro",
            BusinessSize::Small => "small",
            BusinessSize::Medium => "medium",
            BusinessSize::Large => "large",
        }
    }
}

/// Contributors to the composite risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactorKind {
    BaseRate,
    AssetExposure,
    WorkforceSize,
    ConcernDiversity,
}

impl RiskFactorKind {
    pub const fn label(self) -> &'static str {
        match self {
            RiskFactorKind::BaseRate => "base rate",
            RiskFactorKind::AssetExposure => "asset exposure",
            RiskFactorKind::WorkforceSize => "workforce size",
            RiskFactorKind::ConcernDiversity => "concern diversity",
        }
    }
}

/// One additive component of the risk score, with an explanatory note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskComponent {
    pub factor: RiskFactorKind,
    pub score: u8,
    pub notes: String,
}

/// Composite risk picture produced by the risk engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskProfile {
    pub risk_score: u8,
    pub risk_level: RiskLevel,
    pub asset_total: f64,
    pub business_size: BusinessSize,
    pub components: Vec<RiskComponent>,
}

/// Catalog entry describing one insurable product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsuranceTemplate {
    pub name: String,
    pub policy_type: String,
    pub provider: String,
    pub business_types: Vec<String>,
    pub target_industries: Vec<String>,
    pub coverage_min: f64,
    pub coverage_max: f64,
    pub base_premium: f64,
    pub description: String,
    pub regulatory_authority: String,
    pub legal_compliance: bool,
    pub risk_tags: Vec<String>,
    pub features: Vec<String>,
}

/// Ranked product suggestion with scaled coverage and premium estimates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub policy_name: String,
    pub policy_type: String,
    pub provider: String,
    pub match_score: u32,
    pub coverage_estimate: f64,
    pub coverage_range: String,
    pub premium_estimate: f64,
    pub premium_range: String,
    pub compliance_badge: String,
    pub risk_match: Vec<String>,
    pub reason: String,
    pub features: Vec<String>,
    pub description: String,
}

/// Concern ranked by its fixed severity weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityRisk {
    pub concern: String,
    pub severity: u8,
}

/// Stored assessment with its derived profile and recommendations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentRecord {
    pub id: AssessmentId,
    pub user_id: UserId,
    pub assessment: BusinessAssessment,
    pub profile: RiskProfile,
    pub recommendations: Vec<Recommendation>,
    pub priority_risks: Vec<PriorityRisk>,
    pub created_at: DateTime<Utc>,
    pub is_current: bool,
}

/// Assessment result handed back to callers, noting an empty catalog so the
/// absence of recommendations is distinguishable from a poor match.
#[derive(Debug, Clone, PartialEq)]
pub struct AssessmentOutcome {
    pub record: AssessmentRecord,
    pub catalog_empty: bool,
}

/// Policy registration payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPolicy {
    pub policy_name: String,
    pub provider: String,
    pub policy_type: String,
    pub premium: f64,
    pub coverage: f64,
    pub start_date: NaiveDate,
    pub expiry_date: NaiveDate,
}

/// Stored policy owned by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedPolicy {
    pub id: PolicyId,
    pub user_id: UserId,
    pub policy_name: String,
    pub provider: String,
    pub policy_type: String,
    pub premium: f64,
    pub coverage: f64,
    pub start_date: NaiveDate,
    pub expiry_date: NaiveDate,
    /// Date the renewal conversation should start, 30 days before expiry.
    pub renewal_date: NaiveDate,
}

/// Urgency bands for an approaching expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenewalStatus {
    Urgent,
    Warning,
    Normal,
}

impl RenewalStatus {
    pub fn for_days(days_to_expiry: i64) -> Self {
        if days_to_expiry <= 30 {
            RenewalStatus::Urgent
        } else if days_to_expiry <= 60 {
            RenewalStatus::Warning
        } else {
            RenewalStatus::Normal
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            RenewalStatus::Urgent => "Urgent",
            RenewalStatus::Warning => "Warning",
            RenewalStatus::Normal => "Normal",
        }
    }
}

/// Policy annotated with renewal urgency relative to a given day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolicyView {
    #[serde(flatten)]
    pub policy: TrackedPolicy,
    pub days_to_expiry: i64,
    pub renewal_status: RenewalStatus,
}

impl PolicyView {
    pub fn at(policy: TrackedPolicy, today: NaiveDate) -> Self {
        let days_to_expiry = (policy.expiry_date - today).num_days();
        Self {
            policy,
            days_to_expiry,
            renewal_status: RenewalStatus::for_days(days_to_expiry),
        }
    }
}
