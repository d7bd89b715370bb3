use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use tracing::info;

use super::catalog::{CatalogError, CatalogProvider};
use super::domain::{
    AssessmentId, AssessmentOutcome, AssessmentRecord, BusinessAssessment, NewPolicy, PolicyId,
    PolicyView, TrackedPolicy,
};
use super::recommend::{priority_risks, recommend};
use super::repository::{AssessmentRepository, PolicyRepository, RepositoryError};
use super::risk::assess_risk;
use crate::scoring::UserId;

/// Days before expiry that a renewal becomes due.
const RENEWAL_LEAD_DAYS: i64 = 30;
/// Default look-ahead window for renewal reminders.
pub const DEFAULT_REMINDER_WINDOW_DAYS: i64 = 90;

static ASSESSMENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static POLICY_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_assessment_id() -> AssessmentId {
    let id = ASSESSMENT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    AssessmentId(format!("asm-{id:06}"))
}

fn next_policy_id() -> PolicyId {
    let id = POLICY_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    PolicyId(format!("pol-{id:06}"))
}

/// Service composing the product catalog, risk engine, and both repositories.
pub struct InsuranceAdvisorService<C, A, P> {
    catalog: Arc<C>,
    assessments: Arc<A>,
    policies: Arc<P>,
}

impl<C, A, P> InsuranceAdvisorService<C, A, P>
where
    C: CatalogProvider + 'static,
    A: AssessmentRepository + 'static,
    P: PolicyRepository + 'static,
{
    pub fn new(catalog: Arc<C>, assessments: Arc<A>, policies: Arc<P>) -> Self {
        Self {
            catalog,
            assessments,
            policies,
        }
    }

    /// Assess a business and persist the outcome as the user's current
    /// assessment, superseding any earlier one.
    ///
    /// An empty catalog still produces a stored assessment; the outcome flags
    /// the condition so callers can distinguish it from a poor match.
    pub fn assess(
        &self,
        user_id: UserId,
        assessment: BusinessAssessment,
    ) -> Result<AssessmentOutcome, InsuranceServiceError> {
        if assessment.business_type.trim().is_empty() {
            return Err(InsuranceServiceError::Validation(
                "business_type must not be empty".to_string(),
            ));
        }

        let profile = assess_risk(&assessment);
        let templates = self.catalog.templates()?;
        let catalog_empty = templates.is_empty();
        let recommendations = recommend(&templates, &assessment, &profile);
        let priority_risks = priority_risks(&assessment.primary_concerns);

        info!(
            risk_score = profile.risk_score,
            recommendations = recommendations.len(),
            "business assessed"
        );

        self.assessments.mark_not_current(&user_id)?;
        let record = self.assessments.insert(AssessmentRecord {
            id: next_assessment_id(),
            user_id,
            assessment,
            profile,
            recommendations,
            priority_risks,
            created_at: Utc::now(),
            is_current: true,
        })?;

        Ok(AssessmentOutcome {
            record,
            catalog_empty,
        })
    }

    /// Fetch a stored assessment; ownership by another user reads as absent.
    pub fn assessment(
        &self,
        user_id: &UserId,
        id: &AssessmentId,
    ) -> Result<AssessmentRecord, InsuranceServiceError> {
        let record = self
            .assessments
            .fetch(id)?
            .filter(|record| &record.user_id == user_id)
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    /// The user's current assessment, if one exists.
    pub fn current_assessment(
        &self,
        user_id: &UserId,
    ) -> Result<Option<AssessmentRecord>, InsuranceServiceError> {
        Ok(self.assessments.current_for_user(user_id)?)
    }

    /// Catalog listing with optional business-type and policy-type filters.
    pub fn templates(
        &self,
        business_type: Option<&str>,
        policy_type: Option<&str>,
    ) -> Result<Vec<super::domain::InsuranceTemplate>, InsuranceServiceError> {
        let mut templates = self.catalog.templates()?;
        if let Some(business_type) = business_type {
            let wanted = business_type.trim().to_lowercase();
            templates.retain(|template| {
                template
                    .business_types
                    .iter()
                    .any(|candidate| candidate.trim().to_lowercase() == wanted)
            });
        }
        if let Some(policy_type) = policy_type {
            let wanted = policy_type.trim().to_lowercase();
            templates.retain(|template| template.policy_type.to_lowercase() == wanted);
        }
        Ok(templates)
    }

    /// Register a purchased policy for renewal tracking.
    pub fn add_policy(
        &self,
        user_id: UserId,
        policy: NewPolicy,
    ) -> Result<TrackedPolicy, InsuranceServiceError> {
        if policy.policy_name.trim().is_empty() {
            return Err(InsuranceServiceError::Validation(
                "policy_name must not be empty".to_string(),
            ));
        }
        if policy.expiry_date <= policy.start_date {
            return Err(InsuranceServiceError::Validation(
                "expiry_date must fall after start_date".to_string(),
            ));
        }
        if !policy.premium.is_finite() || policy.premium < 0.0 {
            return Err(InsuranceServiceError::Validation(
                "premium must be a non-negative amount".to_string(),
            ));
        }

        let renewal_date = policy.expiry_date - Duration::days(RENEWAL_LEAD_DAYS);
        let stored = self.policies.insert(TrackedPolicy {
            id: next_policy_id(),
            user_id,
            policy_name: policy.policy_name,
            provider: policy.provider,
            policy_type: policy.policy_type,
            premium: policy.premium,
            coverage: policy.coverage,
            start_date: policy.start_date,
            expiry_date: policy.expiry_date,
            renewal_date,
        })?;
        Ok(stored)
    }

    /// All tracked policies annotated with renewal urgency as of `today`.
    pub fn policies(
        &self,
        user_id: &UserId,
        today: NaiveDate,
    ) -> Result<Vec<PolicyView>, InsuranceServiceError> {
        let policies = self.policies.list_for_user(user_id)?;
        Ok(policies
            .into_iter()
            .map(|policy| PolicyView::at(policy, today))
            .collect())
    }

    pub fn remove_policy(
        &self,
        user_id: &UserId,
        id: &PolicyId,
    ) -> Result<TrackedPolicy, InsuranceServiceError> {
        Ok(self.policies.remove(user_id, id)?)
    }

    /// Policies expiring within the reminder window, soonest first. Already
    /// expired policies are excluded.
    pub fn reminders(
        &self,
        user_id: &UserId,
        today: NaiveDate,
        window_days: i64,
    ) -> Result<Vec<PolicyView>, InsuranceServiceError> {
        let mut due: Vec<PolicyView> = self
            .policies(user_id, today)?
            .into_iter()
            .filter(|view| (0..=window_days).contains(&view.days_to_expiry))
            .collect();
        due.sort_by_key(|view| view.days_to_expiry);
        Ok(due)
    }
}

/// Error raised by the insurance advisor service.
#[derive(Debug, thiserror::Error)]
pub enum InsuranceServiceError {
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
