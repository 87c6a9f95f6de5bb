//! Unified error type for the domain layer

use thiserror::Error;

/// Error type for domain validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed (e.g., wrong option count, blank text)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Two options in the same list share an id
    #[error("Duplicate {kind} id: {id}")]
    DuplicateId { kind: &'static str, id: String },
}

impl DomainError {
    /// Creates a validation error for a violated scenario invariant.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a duplicate id error
    pub fn duplicate_id(kind: &'static str, id: impl Into<String>) -> Self {
        Self::DuplicateId {
            kind,
            id: id.into(),
        }
    }
}
