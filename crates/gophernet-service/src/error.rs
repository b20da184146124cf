//! Error types for service operations

use gophernet_store::StoreError;
use thiserror::Error;

/// Errors surfaced by [`crate::BurrowService`]
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Storage layer error, displayed unchanged
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Report could not be produced
    ///
    /// [`crate::GopherNetService`] never returns this; formatting a
    /// snapshot cannot fail. Other [`crate::BurrowService`] implementations
    /// use it to reach the HTTP 500 path.
    #[error("failed to generate report: {0}")]
    Report(String),
}

impl ServiceError {
    /// Whether this is a rental rejection (unknown or unavailable burrow)
    pub fn is_rental_rejection(&self) -> bool {
        matches!(
            self,
            ServiceError::Store(StoreError::NotFound { .. } | StoreError::Unavailable { .. })
        )
    }
}
