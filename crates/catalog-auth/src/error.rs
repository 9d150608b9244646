//! Authentication error types.

/// Errors surfaced by the authentication crate.
///
/// Token validation failures are not represented here: they are reported as
/// [`crate::TokenError`] by `TokenService::decode` and collapse to a negative
/// result everywhere else.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Authentication settings are missing or invalid.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration problem.
        message: String,
    },

    /// The request lacks valid authentication credentials.
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Description of why the request is unauthorized.
        message: String,
    },

    /// Salt generation or key derivation failed.
    #[error("Hashing error: {message}")]
    Hashing {
        /// Description of the hashing failure.
        message: String,
    },

    /// Token signing or another internal step failed.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl AuthError {
    /// Creates a new `Configuration` error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a new `Unauthorized` error.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Creates a new `Hashing` error.
    #[must_use]
    pub fn hashing(message: impl Into<String>) -> Self {
        Self::Hashing {
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

    /// Returns `true` if the caller is at fault (4xx).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}

impl From<AuthError> for catalog_core::Failure {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Unauthorized { message } => Self::unauthorized(message),
            other => {
                tracing::error!(error = %other, "authentication failure");
                Self::internal("Internal server error")
            }
        }
    }
}
