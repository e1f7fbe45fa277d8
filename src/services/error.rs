//! Engine error taxonomy shared by every processor and the façade.

use crate::domain::DomainError;
use crate::ports::StoreError;
use thiserror::Error;

/// Result type for processor and façade operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors surfaced through the request/response contract.
///
/// Processors return the first error encountered; the façade propagates it
/// unchanged inside the response envelope.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The requester lacks the bits required for the operation.
    #[error("access denied: insufficient rights for this operation")]
    AccessDenied,

    /// No board matched the request.
    #[error("board does not exist")]
    BoardNotFound,

    /// No list matched the request, or the containing list is missing.
    #[error("list does not exist")]
    ListNotFound,

    /// No card matched the request, or the targeted card is missing.
    #[error("card does not exist")]
    CardNotFound,

    /// No tag matched the request.
    #[error("tag does not exist")]
    TagNotFound,

    /// The targeted card has no plan.
    #[error("plan does not exist")]
    PlanNotFound,

    /// The request cannot be routed or is missing a required field.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The request carries no operation tag.
    #[error("request operation not specified")]
    OperationNotSpecified,

    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl EngineError {
    /// Builds an [`EngineError::InvalidRequest`] with the given reason.
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidRequest(reason.into())
    }
}
