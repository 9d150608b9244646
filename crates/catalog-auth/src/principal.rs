//! The authenticated caller.

use catalog_core::UserRole;
use time::OffsetDateTime;

use crate::token::{IdentityClaims, TokenError};

/// Identity extracted from a valid token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: i64,
    pub email: String,
    pub role: UserRole,
    /// `jti` of the presenting token.
    pub token_id: String,
    pub expires_at: OffsetDateTime,
}

impl Principal {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

impl TryFrom<IdentityClaims> for Principal {
    type Error = TokenError;

    fn try_from(claims: IdentityClaims) -> Result<Self, Self::Error> {
        let user_id = claims
            .sub
            .parse::<i64>()
            .map_err(|_| TokenError::invalid_claims(format!("sub is not a user id: {}", claims.sub)))?;
        let role = claims
            .role
            .parse::<UserRole>()
            .map_err(|e| TokenError::invalid_claims(e.to_string()))?;
        let expires_at = OffsetDateTime::from_unix_timestamp(claims.exp)
            .map_err(|e| TokenError::invalid_claims(format!("exp out of range: {e}")))?;

        Ok(Self {
            user_id,
            email: claims.email,
            role,
            token_id: claims.jti,
            expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(sub: &str, role: &str) -> IdentityClaims {
        IdentityClaims {
            sub: sub.into(),
            email: "a@b.com".into(),
            role: role.into(),
            jti: "jti-1".into(),
            iat: 1_000,
            exp: 2_000,
            iss: "catalog-api".into(),
            aud: "catalog-api".into(),
        }
    }

    #[test]
    fn test_principal_from_claims() {
        let principal = Principal::try_from(claims("42", "Admin")).unwrap();
        assert_eq!(principal.user_id, 42);
        assert!(principal.is_admin());
        assert_eq!(principal.expires_at.unix_timestamp(), 2_000);
    }

    #[test]
    fn test_non_numeric_subject_is_invalid() {
        let err = Principal::try_from(claims("alice", "User")).unwrap_err();
        assert!(matches!(err, TokenError::InvalidClaims { .. }));
    }

    #[test]
    fn test_unknown_role_is_invalid() {
        let err = Principal::try_from(claims("42", "root")).unwrap_err();
        assert!(matches!(err, TokenError::InvalidClaims { .. }));
    }
}
