use thiserror::Error;

use tillpoint_core::DomainError;

/// Why a restock action was refused or failed.
///
/// The `Display` text is what the operator sees in the error notification.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RestockError {
    /// No supplier selected (or no quantity).
    #[error("supplier and quantity required")]
    MissingInput,

    /// No operator to attribute the order to.
    #[error("session not found")]
    SessionNotFound,

    /// The back-office refused the order or the call failed; message verbatim.
    #[error("{0}")]
    Submission(String),

    /// The payload broke an order invariant before it was sent.
    #[error("invalid restock: {0}")]
    Invalid(#[from] DomainError),

    /// The action is not allowed in the dialog's current state.
    #[error("restock dialog is {0}")]
    NotEditable(&'static str),
}
