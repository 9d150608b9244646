//! HS256 identity tokens.
//!
//! A token carries `sub` (user id as a decimal string), `email`, `role`,
//! a unique `jti`, `iat`, `exp`, `iss` and `aud`, signed with the configured
//! HMAC secret. It is valid while `iat <= now <= exp` with no clock-skew
//! allowance, and only when issuer and audience match this service.
//!
//! ## Example
//!
//! ```ignore
//! use catalog_auth::{AuthConfig, TokenService};
//! use catalog_core::UserRole;
//!
//! let service = TokenService::new(&AuthConfig::with_secret(secret))?;
//! let issued = service.issue(42, "a@b.com", UserRole::User)?;
//! assert!(service.validate(&issued.token));
//! ```

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use catalog_core::UserRole;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::principal::Principal;
use crate::token::clock::{SystemClock, TokenClock};

// ============================================================================
// Error Types
// ============================================================================

/// Reasons a token is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// `now` is past `exp`.
    #[error("Token expired")]
    Expired,

    /// `now` is before `iat`.
    #[error("Token not yet valid")]
    NotYetValid,

    /// The signature does not match the payload under the current secret.
    #[error("Invalid signature")]
    InvalidSignature,

    /// Issuer, audience or another claim is wrong or missing.
    #[error("Invalid claims: {message}")]
    InvalidClaims {
        /// Description of why claims are invalid.
        message: String,
    },

    /// Not a well-formed JWT.
    #[error("Malformed token: {message}")]
    Malformed {
        /// Description of the decoding failure.
        message: String,
    },
}

impl TokenError {
    /// Creates a new `InvalidClaims` error.
    #[must_use]
    pub fn invalid_claims(message: impl Into<String>) -> Self {
        Self::InvalidClaims {
            message: message.into(),
        }
    }

    /// Creates a new `Malformed` error.
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }

    /// Short label used in logs and metrics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Expired => "expired",
            Self::NotYetValid => "not_yet_valid",
            Self::InvalidSignature => "invalid_signature",
            Self::InvalidClaims { .. } => "invalid_claims",
            Self::Malformed { .. } => "malformed",
        }
    }
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::ImmatureSignature => Self::NotYetValid,
            ErrorKind::InvalidSignature
            | ErrorKind::InvalidAlgorithm
            | ErrorKind::InvalidAlgorithmName
            | ErrorKind::MissingAlgorithm => Self::InvalidSignature,
            ErrorKind::InvalidAudience
            | ErrorKind::InvalidIssuer
            | ErrorKind::InvalidSubject
            | ErrorKind::MissingRequiredClaim(_)
            | ErrorKind::Json(_) => Self::invalid_claims(err.to_string()),
            _ => Self::malformed(err.to_string()),
        }
    }
}

// ============================================================================
// Claims
// ============================================================================

/// Registered and private claims of an identity token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaims {
    /// User id, decimal.
    pub sub: String,
    pub email: String,
    pub role: String,
    /// Unique per issued token.
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
    pub aud: String,
}

/// A freshly signed token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub token_id: String,
    pub expires_at: OffsetDateTime,
}

// ============================================================================
// Token Service
// ============================================================================

/// Issues and validates identity tokens.
///
/// Immutable after construction; share it behind an `Arc`.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
    audience: String,
    lifetime: Duration,
    clock: Arc<dyn TokenClock>,
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("lifetime", &self.lifetime)
            .field("keys", &"[REDACTED]")
            .finish()
    }
}

impl TokenService {
    /// Builds a service from configuration.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Configuration` when the signing secret is absent
    /// or blank.
    pub fn new(config: &AuthConfig) -> Result<Self, AuthError> {
        let secret = config.require_secret()?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);
        validation.set_audience(&[&config.audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
        // The time window is checked against the injected clock in `decode`.
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.leeway = 0;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.expose()),
            decoding_key: DecodingKey::from_secret(secret.expose()),
            validation,
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            lifetime: config.token_lifetime,
            clock: Arc::new(SystemClock),
        })
    }

    /// Replaces the time source.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn TokenClock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replaces the token lifetime. Zero yields tokens valid only within the
    /// second they were issued.
    #[must_use]
    pub fn with_lifetime(mut self, lifetime: Duration) -> Self {
        self.lifetime = lifetime;
        self
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Signs a token for the given identity.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Internal` if signing fails or the expiry falls
    /// outside the representable range.
    pub fn issue(
        &self,
        subject_id: i64,
        email: &str,
        role: UserRole,
    ) -> Result<IssuedToken, AuthError> {
        let iat = self.clock.now_epoch_secs();
        let lifetime = i64::try_from(self.lifetime.as_secs()).unwrap_or(i64::MAX);
        let exp = iat.saturating_add(lifetime);

        let claims = IdentityClaims {
            sub: subject_id.to_string(),
            email: email.to_string(),
            role: role.to_string(),
            jti: Uuid::new_v4().to_string(),
            iat,
            exp,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::internal(format!("failed to sign token: {e}")))?;
        let expires_at = OffsetDateTime::from_unix_timestamp(exp)
            .map_err(|e| AuthError::internal(format!("token expiry out of range: {e}")))?;

        tracing::debug!(subject = subject_id, jti = %claims.jti, exp, "issued identity token");
        metrics::counter!("catalog_tokens_issued_total").increment(1);

        Ok(IssuedToken {
            token,
            token_id: claims.jti,
            expires_at,
        })
    }

    /// Verifies signature, issuer, audience and time window.
    ///
    /// # Errors
    ///
    /// Returns the specific [`TokenError`] for the first failed check.
    pub fn decode(&self, token: &str) -> Result<IdentityClaims, TokenError> {
        let claims = decode::<IdentityClaims>(token, &self.decoding_key, &self.validation)?.claims;

        if claims.exp < claims.iat {
            return Err(TokenError::invalid_claims("exp precedes iat"));
        }

        let now = self.clock.now_epoch_secs();
        if now < claims.iat {
            return Err(TokenError::NotYetValid);
        }
        if now > claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }

    /// `true` only for a token that [`decode`](Self::decode) accepts.
    pub fn validate(&self, token: &str) -> bool {
        self.authenticate(token).is_some()
    }

    /// The principal carried by a valid token; `None` for any failure.
    pub fn authenticate(&self, token: &str) -> Option<Principal> {
        match self.decode(token).and_then(Principal::try_from) {
            Ok(principal) => {
                metrics::counter!("catalog_token_validations_total", "outcome" => "valid")
                    .increment(1);
                Some(principal)
            }
            Err(e) => {
                match &e {
                    TokenError::Expired | TokenError::NotYetValid => {
                        tracing::debug!(reason = e.kind(), "rejected identity token");
                    }
                    _ => {
                        tracing::warn!(reason = e.kind(), error = %e, "rejected identity token");
                    }
                }
                metrics::counter!("catalog_token_validations_total", "outcome" => e.kind())
                    .increment(1);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::clock::{FixedClock, ManualClock};
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    const SECRET: &str = "test-signing-secret-that-is-long-enough";

    fn service() -> TokenService {
        TokenService::new(&AuthConfig::with_secret(SECRET)).unwrap()
    }

    #[test]
    fn test_missing_secret_is_a_configuration_error() {
        let err = TokenService::new(&AuthConfig::default()).unwrap_err();
        assert!(matches!(err, AuthError::Configuration { .. }));

        let err = TokenService::new(&AuthConfig::with_secret("")).unwrap_err();
        assert!(matches!(err, AuthError::Configuration { .. }));
    }

    #[test]
    fn test_issue_then_decode() {
        let service = service();
        let issued = service.issue(42, "a@b.com", UserRole::User).unwrap();

        let claims = service.decode(&issued.token).unwrap();
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.email, "a@b.com");
        assert_eq!(claims.role, "User");
        assert_eq!(claims.iss, "catalog-api");
        assert_eq!(claims.aud, "catalog-api");
        assert_eq!(claims.jti, issued.token_id);
        assert_eq!(claims.exp - claims.iat, 86_400);
        assert_eq!(issued.expires_at.unix_timestamp(), claims.exp);
    }

    #[test]
    fn test_each_token_has_a_unique_id() {
        let service = service();
        let first = service.issue(1, "a@b.com", UserRole::User).unwrap();
        let second = service.issue(1, "a@b.com", UserRole::User).unwrap();
        assert_ne!(first.token_id, second.token_id);
        assert_ne!(first.token, second.token);
    }

    #[test]
    fn test_zero_lifetime_expires_after_one_second() {
        let clock = Arc::new(ManualClock::new(1_704_067_200));
        let service = service()
            .with_clock(clock.clone())
            .with_lifetime(Duration::ZERO);

        let issued = service.issue(42, "a@b.com", UserRole::User).unwrap();
        assert!(service.validate(&issued.token));

        clock.advance(Duration::from_secs(1));
        assert!(!service.validate(&issued.token));
        assert_eq!(service.decode(&issued.token), Err(TokenError::Expired));
    }

    #[test]
    fn test_exp_boundary_is_inclusive() {
        let clock = Arc::new(ManualClock::new(1_000));
        let service = service()
            .with_clock(clock.clone())
            .with_lifetime(Duration::from_secs(60));
        let issued = service.issue(7, "a@b.com", UserRole::Admin).unwrap();

        clock.set(1_060);
        assert!(service.validate(&issued.token));
        clock.set(1_061);
        assert!(!service.validate(&issued.token));
    }

    #[test]
    fn test_token_from_the_future_is_not_yet_valid() {
        let issuer = service().with_clock(Arc::new(FixedClock(2_000)));
        let issued = issuer.issue(7, "a@b.com", UserRole::User).unwrap();

        let checker = service().with_clock(Arc::new(FixedClock(1_999)));
        assert_eq!(checker.decode(&issued.token), Err(TokenError::NotYetValid));
        assert!(!checker.validate(&issued.token));
    }

    #[test]
    fn test_tampered_payload_is_rejected() {
        let service = service();
        let issued = service.issue(42, "a@b.com", UserRole::User).unwrap();

        let parts: Vec<&str> = issued.token.split('.').collect();
        let payload = URL_SAFE_NO_PAD.decode(parts[1]).unwrap();
        let forged = String::from_utf8(payload)
            .unwrap()
            .replace("\"role\":\"User\"", "\"role\":\"Admin\"");
        let forged_token = format!(
            "{}.{}.{}",
            parts[0],
            URL_SAFE_NO_PAD.encode(forged),
            parts[2]
        );

        assert_eq!(
            service.decode(&forged_token),
            Err(TokenError::InvalidSignature)
        );
        assert!(!service.validate(&forged_token));
    }

    #[test]
    fn test_other_secret_is_rejected() {
        let issued = service().issue(42, "a@b.com", UserRole::User).unwrap();
        let other = TokenService::new(&AuthConfig::with_secret("a-different-secret-value-entirely"))
            .unwrap();
        assert_eq!(other.decode(&issued.token), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_wrong_audience_or_issuer_is_rejected() {
        let issued = service().issue(42, "a@b.com", UserRole::User).unwrap();

        let mut config = AuthConfig::with_secret(SECRET);
        config.audience = "someone-else".into();
        let other = TokenService::new(&config).unwrap();
        assert!(matches!(
            other.decode(&issued.token),
            Err(TokenError::InvalidClaims { .. })
        ));

        let mut config = AuthConfig::with_secret(SECRET);
        config.issuer = "someone-else".into();
        let other = TokenService::new(&config).unwrap();
        assert!(matches!(
            other.decode(&issued.token),
            Err(TokenError::InvalidClaims { .. })
        ));
    }

    #[test]
    fn test_garbage_is_malformed_not_a_panic() {
        let service = service();
        for token in ["", "abc", "a.b.c", "....", "Bearer x"] {
            assert!(!service.validate(token));
            assert!(service.authenticate(token).is_none());
        }
        assert!(matches!(
            service.decode("not-a-jwt"),
            Err(TokenError::Malformed { .. })
        ));
    }

    #[test]
    fn test_authenticate_returns_principal() {
        let service = service();
        let issued = service.issue(42, "a@b.com", UserRole::Admin).unwrap();
        let principal = service.authenticate(&issued.token).unwrap();
        assert_eq!(principal.user_id, 42);
        assert_eq!(principal.email, "a@b.com");
        assert_eq!(principal.role, UserRole::Admin);
        assert_eq!(principal.token_id, issued.token_id);
    }

    #[test]
    fn test_debug_hides_keys() {
        let printed = format!("{:?}", service());
        assert!(!printed.contains(SECRET));
    }
}
