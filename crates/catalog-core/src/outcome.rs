//! Business outcome type shared by command and query handlers.
//!
//! Handlers never signal expected business results (missing records, failed
//! ownership checks, invalid input) through panics or infrastructure errors.
//! They return an [`Outcome`], whose failure side is a [`Failure`] tagged with
//! a [`FailureKind`]. The HTTP layer maps the kind to a status code.
//!
//! ```
//! use catalog_core::{Failure, FailureKind, Outcome};
//!
//! fn find(id: i64) -> Outcome<&'static str> {
//!     if id == 7 {
//!         Ok("widget")
//!     } else {
//!         Err(Failure::not_found("Product not found"))
//!     }
//! }
//!
//! assert_eq!(find(7), Ok("widget"));
//! assert_eq!(find(8).unwrap_err().kind(), FailureKind::NotFound);
//! ```

use serde::Serialize;

/// Result of a command or query handler.
pub type Outcome<T> = std::result::Result<T, Failure>;

/// Classification of a business failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Input failed one or more validation rules.
    Validation,
    /// The addressed record does not exist (or is soft-deleted).
    NotFound,
    /// Credentials are missing, invalid, or rejected.
    Unauthorized,
    /// The caller is authenticated but may not act on the record.
    Forbidden,
    /// The request conflicts with existing state (e.g. duplicate email).
    Conflict,
    /// An infrastructure fault; the message is safe to show, details are logged
    /// where the fault was converted.
    Internal,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
            Self::NotFound => write!(f, "not_found"),
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::Forbidden => write!(f, "forbidden"),
            Self::Conflict => write!(f, "conflict"),
            Self::Internal => write!(f, "internal"),
        }
    }
}

/// A business failure: a kind, a human readable message, and for validation
/// failures the individual rule messages.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct Failure {
    kind: FailureKind,
    message: String,
    errors: Vec<String>,
}

impl Failure {
    /// Creates a validation failure from the list of violated rules.
    #[must_use]
    pub fn validation(errors: Vec<String>) -> Self {
        Self {
            kind: FailureKind::Validation,
            message: "Validation failed".to_string(),
            errors,
        }
    }

    /// Creates a not-found failure.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::with_kind(FailureKind::NotFound, message)
    }

    /// Creates an unauthorized failure.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::with_kind(FailureKind::Unauthorized, message)
    }

    /// Creates a forbidden failure.
    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::with_kind(FailureKind::Forbidden, message)
    }

    /// Creates a conflict failure.
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::with_kind(FailureKind::Conflict, message)
    }

    /// Creates an internal failure.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::with_kind(FailureKind::Internal, message)
    }

    fn with_kind(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            errors: Vec::new(),
        }
    }

    /// Returns the failure kind.
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    /// Returns the human readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether the caller is at fault.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.kind != FailureKind::Internal
    }

    /// Returns the individual validation messages (empty for other kinds).
    #[must_use]
    pub fn errors(&self) -> &[String] {
        &self.errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_failure_keeps_rule_messages() {
        let failure = Failure::validation(vec![
            "Product name is required".to_string(),
            "Price must be greater than 0".to_string(),
        ]);

        assert_eq!(failure.kind(), FailureKind::Validation);
        assert_eq!(failure.message(), "Validation failed");
        assert_eq!(failure.errors().len(), 2);
    }

    #[test]
    fn test_single_message_failures() {
        let not_found = Failure::not_found("Product not found");
        assert_eq!(not_found.kind(), FailureKind::NotFound);
        assert_eq!(not_found.to_string(), "Product not found");
        assert!(not_found.errors().is_empty());

        assert_eq!(
            Failure::forbidden("You can only delete your own products").kind(),
            FailureKind::Forbidden
        );
        assert_eq!(
            Failure::unauthorized("Invalid email or password").kind(),
            FailureKind::Unauthorized
        );
        assert_eq!(
            Failure::conflict("User with this email already exists").kind(),
            FailureKind::Conflict
        );
        assert!(!Failure::internal("Internal server error").is_client_error());
    }

    #[test]
    fn test_outcome_composes_with_question_mark() {
        fn inner(ok: bool) -> Outcome<u32> {
            if ok {
                Ok(1)
            } else {
                Err(Failure::not_found("missing"))
            }
        }

        fn outer(ok: bool) -> Outcome<u32> {
            Ok(inner(ok)? + 1)
        }

        assert_eq!(outer(true), Ok(2));
        assert_eq!(outer(false).unwrap_err().kind(), FailureKind::NotFound);
    }
}
