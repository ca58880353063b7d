use thiserror::Error;

use tillpoint_core::{DomainError, RemoteError};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("lock poisoned")]
    Poisoned,

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl From<StoreError> for RemoteError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Poisoned => RemoteError::transport("back-office state unavailable"),
            StoreError::Domain(err) => RemoteError::rejected(err.to_string()),
        }
    }
}
