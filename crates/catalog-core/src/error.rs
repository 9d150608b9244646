use thiserror::Error;

/// Core error types for catalog operations
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid user role: {0}")]
    InvalidRole(String),

    #[error("Invalid identifier: {0}")]
    InvalidId(String),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl CoreError {
    /// Create a new InvalidRole error
    pub fn invalid_role(role: impl Into<String>) -> Self {
        Self::InvalidRole(role.into())
    }

    /// Create a new InvalidId error
    pub fn invalid_id(id: impl Into<String>) -> Self {
        Self::InvalidId(id.into())
    }

    /// Create a new Configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Check if this error is a client error (4xx category)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidRole(_) | Self::InvalidId(_) | Self::JsonError(_)
        )
    }
}

/// Convenience result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = CoreError::invalid_role("Superuser");
        assert_eq!(err.to_string(), "Invalid user role: Superuser");
        assert!(err.is_client_error());
    }

    #[test]
    fn test_configuration_error_is_not_client_error() {
        let err = CoreError::configuration("missing signing secret");
        assert_eq!(
            err.to_string(),
            "Configuration error: missing signing secret"
        );
        assert!(!err.is_client_error());
    }
}
