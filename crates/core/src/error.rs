//! Domain error model.

use thiserror::Error;

/// Domain-level error.
///
/// Keep this focused on deterministic failures that can be decided before any
/// remote call is made. Gateway and storage failures belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. missing form field).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. not a global id).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    /// Human-readable message without the category prefix.
    pub fn message(&self) -> String {
        match self {
            DomainError::Validation(msg) | DomainError::InvalidId(msg) => msg.clone(),
        }
    }
}
