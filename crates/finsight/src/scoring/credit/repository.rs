use super::domain::{InvoiceId, InvoiceRecord};
use crate::scoring::UserId;

/// Storage abstraction so the scoring service can be exercised in isolation.
pub trait InvoiceRepository: Send + Sync {
    /// Insert a new record. Implementations must reject a second record with
    /// the same (user, invoice number) pair with [`RepositoryError::Conflict`].
    fn insert(&self, record: InvoiceRecord) -> Result<InvoiceRecord, RepositoryError>;
    fn find_by_number(
        &self,
        user_id: &UserId,
        invoice_number: &str,
    ) -> Result<Option<InvoiceRecord>, RepositoryError>;
    fn fetch(&self, id: &InvoiceId) -> Result<Option<InvoiceRecord>, RepositoryError>;
    fn list_for_user(&self, user_id: &UserId) -> Result<Vec<InvoiceRecord>, RepositoryError>;
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
