//! Token signing configuration.

use std::fmt;
use std::time::Duration;

use serde::Deserialize;

use crate::error::AuthError;

/// Secrets shorter than this are accepted with a warning.
pub const RECOMMENDED_SECRET_LEN: usize = 32;

/// HMAC signing secret. Never printed.
#[derive(Clone, Deserialize)]
#[serde(transparent)]
pub struct SigningSecret(String);

impl SigningSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn expose(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningSecret([REDACTED])")
    }
}

/// `[auth]` section.
///
/// # Example (TOML)
///
/// ```toml
/// [auth]
/// signing_secret = "change-me-to-a-long-random-string"
/// issuer = "catalog-api"
/// audience = "catalog-api"
/// token_lifetime = "24h"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Required at startup; there is no built-in fallback secret.
    pub signing_secret: Option<SigningSecret>,

    /// Value of the `iss` claim, checked on validation.
    pub issuer: String,

    /// Value of the `aud` claim, checked on validation.
    pub audience: String,

    /// Time between `iat` and `exp` of issued tokens.
    #[serde(with = "humantime_serde")]
    pub token_lifetime: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            signing_secret: None,
            issuer: "catalog-api".to_string(),
            audience: "catalog-api".to_string(),
            token_lifetime: Duration::from_secs(24 * 60 * 60),
        }
    }
}

impl AuthConfig {
    /// Config with the given secret and default claims.
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            signing_secret: Some(SigningSecret::new(secret)),
            ..Self::default()
        }
    }

    /// Returns the signing secret, or a configuration error when it is
    /// absent or blank.
    pub fn require_secret(&self) -> Result<&SigningSecret, AuthError> {
        match &self.signing_secret {
            Some(secret) if !secret.is_blank() => Ok(secret),
            _ => Err(AuthError::configuration(
                "auth.signing_secret is required (set CATALOG__AUTH__SIGNING_SECRET)",
            )),
        }
    }

    pub fn validate(&self) -> Result<(), AuthError> {
        let secret = self.require_secret()?;
        if secret.len() < RECOMMENDED_SECRET_LEN {
            tracing::warn!(
                length = secret.len(),
                recommended = RECOMMENDED_SECRET_LEN,
                "auth.signing_secret is shorter than recommended"
            );
        }
        if self.issuer.trim().is_empty() {
            return Err(AuthError::configuration("auth.issuer must not be empty"));
        }
        if self.audience.trim().is_empty() {
            return Err(AuthError::configuration("auth.audience must not be empty"));
        }
        if self.token_lifetime.is_zero() {
            return Err(AuthError::configuration(
                "auth.token_lifetime must be greater than zero",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AuthConfig::default();
        assert!(config.signing_secret.is_none());
        assert_eq!(config.issuer, "catalog-api");
        assert_eq!(config.token_lifetime, Duration::from_secs(86_400));
    }

    #[test]
    fn test_missing_or_blank_secret_is_rejected() {
        assert!(AuthConfig::default().validate().is_err());
        assert!(AuthConfig::with_secret("   ").validate().is_err());
        assert!(AuthConfig::with_secret("a-very-long-secret-value-for-tests!!").validate().is_ok());
    }

    #[test]
    fn test_zero_lifetime_is_rejected() {
        let mut config = AuthConfig::with_secret("a-very-long-secret-value-for-tests!!");
        config.token_lifetime = Duration::ZERO;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_secret_is_redacted_in_debug() {
        let config = AuthConfig::with_secret("super-secret-value");
        let printed = format!("{config:?}");
        assert!(!printed.contains("super-secret-value"));
        assert!(printed.contains("REDACTED"));
    }

    #[test]
    fn test_lifetime_parses_humantime() {
        let config: AuthConfig =
            serde_json::from_str(r#"{"signing_secret":"s","token_lifetime":"90m"}"#).unwrap();
        assert_eq!(config.token_lifetime, Duration::from_secs(90 * 60));
        assert_eq!(config.audience, "catalog-api");
    }
}
