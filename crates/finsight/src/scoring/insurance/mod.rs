//! Insurance risk assessment, cover recommendations, and policy tracking.
//!
//! Risk scoring is additive over a fixed set of components; recommendations
//! rank a product catalog against the assessed profile. Each new assessment
//! supersedes the user's previous one, which stays fetchable by id.

pub mod catalog;
pub mod domain;
pub mod recommend;
pub mod repository;
pub mod risk;
pub mod router;
pub mod service;

pub use catalog::{CatalogError, CatalogProvider, StaticCatalog};
pub use domain::{
    AssessmentId, AssessmentOutcome, AssessmentPreferences, AssessmentRecord, BusinessAssessment,
    BusinessSize, InsuranceTemplate, NewPolicy, PolicyId, PolicyView, PriorityRisk,
    Recommendation, RenewalStatus, RiskComponent, RiskFactorKind, RiskLevel, RiskProfile,
    TrackedPolicy,
};
pub use recommend::{priority_risks, recommend};
pub use repository::{AssessmentRepository, PolicyRepository, RepositoryError};
pub use risk::assess_risk;
pub use router::insurance_router;
pub use service::{InsuranceAdvisorService, InsuranceServiceError, DEFAULT_REMINDER_WINDOW_DAYS};

#[cfg(test)]
mod tests;
