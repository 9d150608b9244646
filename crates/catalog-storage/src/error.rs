//! Storage error types.
//!
//! Missing records are not errors at this layer: lookups return `Option`.
//! These variants cover writes against absent rows, uniqueness violations,
//! and infrastructure faults.

use std::fmt;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The record addressed by a write was not found.
    #[error("Record not found: {entity}/{id}")]
    NotFound {
        /// The kind of record (e.g. `user`, `product`).
        entity: String,
        /// The identifier that was not found.
        id: String,
    },

    /// A uniqueness constraint would be violated.
    #[error("Record already exists: {entity}/{key}")]
    AlreadyExists {
        /// The kind of record.
        entity: String,
        /// The conflicting unique key.
        key: String,
    },

    /// Failed to connect to the storage backend.
    #[error("Connection error: {message}")]
    ConnectionError {
        /// Description of the connection error.
        message: String,
    },

    /// An internal storage error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl StorageError {
    /// Creates a new `NotFound` error.
    #[must_use]
    pub fn not_found(entity: impl Into<String>, id: impl fmt::Display) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Creates a new `AlreadyExists` error.
    #[must_use]
    pub fn already_exists(entity: impl Into<String>, key: impl Into<String>) -> Self {
        Self::AlreadyExists {
            entity: entity.into(),
            key: key.into(),
        }
    }

    /// Creates a new `ConnectionError` error.
    #[must_use]
    pub fn connection_error(message: impl Into<String>) -> Self {
        Self::ConnectionError {
            message: message.into(),
        }
    }

    /// Creates a new `Internal` error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns `true` if this is a not found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if this is an already exists error.
    #[must_use]
    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists { .. })
    }

    /// Returns the error category for logging/monitoring purposes.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::AlreadyExists { .. } => ErrorCategory::Conflict,
            Self::ConnectionError { .. } => ErrorCategory::Infrastructure,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}

impl From<StorageError> for catalog_core::Failure {
    fn from(err: StorageError) -> Self {
        match &err {
            StorageError::NotFound { entity, .. } => {
                Self::not_found(format!("{} not found", capitalize(entity)))
            }
            StorageError::AlreadyExists { .. } => Self::conflict(err.to_string()),
            StorageError::ConnectionError { .. } | StorageError::Internal { .. } => {
                tracing::error!(error = %err, category = %err.category(), "storage failure");
                Self::internal("Internal server error")
            }
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Categories of storage errors for logging and monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Record not found.
    NotFound,
    /// Uniqueness conflict.
    Conflict,
    /// Infrastructure/connection error.
    Infrastructure,
    /// Internal error.
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::Conflict => write!(f, "conflict"),
            Self::Infrastructure => write!(f, "infrastructure"),
            Self::Internal => write!(f, "internal"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StorageError::not_found("product", 7);
        assert_eq!(err.to_string(), "Record not found: product/7");

        let err = StorageError::already_exists("user", "a@b.com");
        assert_eq!(err.to_string(), "Record already exists: user/a@b.com");
    }

    #[test]
    fn test_error_predicates() {
        let err = StorageError::not_found("product", 7);
        assert!(err.is_not_found());
        assert!(!err.is_already_exists());

        let err = StorageError::already_exists("user", "a@b.com");
        assert!(err.is_already_exists());
    }

    #[test]
    fn test_error_category() {
        assert_eq!(
            StorageError::not_found("product", 1).category(),
            ErrorCategory::NotFound
        );
        assert_eq!(
            StorageError::already_exists("user", "x").category(),
            ErrorCategory::Conflict
        );
        assert_eq!(
            StorageError::connection_error("refused").category(),
            ErrorCategory::Infrastructure
        );
        assert_eq!(ErrorCategory::Internal.to_string(), "internal");
    }

    #[test]
    fn test_conversion_to_failure() {
        use catalog_core::{Failure, FailureKind};

        let failure = Failure::from(StorageError::not_found("product", 3));
        assert_eq!(failure.kind(), FailureKind::NotFound);
        assert_eq!(failure.message(), "Product not found");

        let failure = Failure::from(StorageError::already_exists("user", "a@b.com"));
        assert_eq!(failure.kind(), FailureKind::Conflict);

        let failure = Failure::from(StorageError::connection_error("refused"));
        assert_eq!(failure.kind(), FailureKind::Internal);
        assert!(!failure.message().contains("refused"));
    }
}
