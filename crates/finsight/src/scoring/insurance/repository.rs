use super::domain::{AssessmentId, AssessmentRecord, PolicyId, TrackedPolicy};
use crate::scoring::UserId;

/// Storage abstraction for assessments so the service can be tested in
/// isolation.
pub trait AssessmentRepository: Send + Sync {
    fn insert(&self, record: AssessmentRecord) -> Result<AssessmentRecord, RepositoryError>;
    fn fetch(&self, id: &AssessmentId) -> Result<Option<AssessmentRecord>, RepositoryError>;
    /// Clear the current flag on every assessment the user owns.
    fn mark_not_current(&self, user_id: &UserId) -> Result<(), RepositoryError>;
    fn current_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<AssessmentRecord>, RepositoryError>;
}

/// Storage abstraction for tracked policies.
pub trait PolicyRepository: Send + Sync {
    fn insert(&self, policy: TrackedPolicy) -> Result<TrackedPolicy, RepositoryError>;
    fn list_for_user(&self, user_id: &UserId) -> Result<Vec<TrackedPolicy>, RepositoryError>;
    /// Remove a policy owned by the user; missing or foreign policies report
    /// [`RepositoryError::NotFound`].
    fn remove(&self, user_id: &UserId, id: &PolicyId) -> Result<TrackedPolicy, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
