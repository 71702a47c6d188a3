//! Store error types.
//!
//! Errors are grouped by who has to act on them:
//!
//! | Category | Variants | Recovery |
//! |----------|----------|----------|
//! | **Transient** | `Unavailable`, `Timeout` | Retry |
//! | **Caller** | `NotFound`, `InvalidInput` | Fix input |
//! | **Wiring** | `CapabilityViolation`, `Configuration` | Fix composition or config |
//! | **Backend** | `Backend` | Backend-specific |
//!
//! A `CapabilityViolation` is never recovered at runtime. It means a backend
//! was wired as something it is not, or a backend does not honour the
//! documented semantics of a contract it claims.

use thiserror::Error;

use crate::record::RecordId;

/// Errors that can occur in store operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StoreError {
    // ── Caller errors (fix input) ────────────────────────────────────
    /// The referenced record does not exist.
    #[error("Record not found: {0}")]
    NotFound(RecordId),

    /// A parameter violates a declared constraint.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // ── Transient errors (retry) ─────────────────────────────────────
    /// The backing medium is not reachable.
    #[error("Backend not available: {0}")]
    Unavailable(String),

    /// The operation did not finish within its deadline.
    #[error("Timeout during {0}")]
    Timeout(String),

    // ── Wiring errors ────────────────────────────────────────────────
    /// A backend does not satisfy a contract it was wired or claimed as.
    #[error("Capability violation: {0}")]
    CapabilityViolation(String),

    /// Configuration error (fix configuration).
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Generic backend error.
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Coarse grouping of [`StoreError`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Retry may succeed.
    Transient,
    /// The caller supplied something the contract rejects.
    Caller,
    /// The composition root or its configuration is wrong.
    Wiring,
    /// Anything a backend could not classify.
    Backend,
}

impl StoreError {
    /// Returns the recovery category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Unavailable(_) | Self::Timeout(_) => ErrorCategory::Transient,
            Self::NotFound(_) | Self::InvalidInput(_) => ErrorCategory::Caller,
            Self::CapabilityViolation(_) | Self::Configuration(_) => ErrorCategory::Wiring,
            Self::Backend(_) => ErrorCategory::Backend,
        }
    }

    /// Returns `true` if this error is transient and the operation may succeed on retry.
    pub fn is_transient(&self) -> bool {
        self.category() == ErrorCategory::Transient
    }

    /// Returns `true` if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_errors() {
        assert!(StoreError::Unavailable("offline".into()).is_transient());
        assert!(StoreError::Timeout("list".into()).is_transient());
        assert!(!StoreError::NotFound(RecordId::new(3)).is_transient());
        assert!(!StoreError::CapabilityViolation("remove".into()).is_transient());
    }

    #[test]
    fn test_error_categories() {
        assert_eq!(
            StoreError::InvalidInput("empty name".into()).category(),
            ErrorCategory::Caller
        );
        assert_eq!(
            StoreError::Configuration("bad backend".into()).category(),
            ErrorCategory::Wiring
        );
        assert_eq!(
            StoreError::Backend("disk".into()).category(),
            ErrorCategory::Backend
        );
    }

    #[test]
    fn test_error_display() {
        let err = StoreError::NotFound(RecordId::new(2));
        assert_eq!(err.to_string(), "Record not found: 2");
        assert!(err.is_not_found());
    }
}
