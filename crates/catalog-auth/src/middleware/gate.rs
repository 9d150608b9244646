//! Bearer token extractors.
//!
//! The gate never rejects a request on its own. [`MaybePrincipal`] resolves
//! the `Authorization` header to an optional [`Principal`]; handlers whose
//! operation needs an identity take [`Authenticated`] instead, which turns
//! an anonymous caller into a 401.
//!
//! # Example
//!
//! ```ignore
//! use axum::{Router, routing::get};
//! use catalog_auth::{AuthState, Authenticated, MaybePrincipal};
//!
//! async fn whoami(MaybePrincipal(principal): MaybePrincipal) -> String {
//!     principal.map(|p| p.email).unwrap_or_else(|| "anonymous".into())
//! }
//!
//! async fn mine(Authenticated(principal): Authenticated) -> String {
//!     principal.user_id.to_string()
//! }
//!
//! let app = Router::new()
//!     .route("/whoami", get(whoami))
//!     .route("/mine", get(mine))
//!     .with_state(auth_state);
//! ```

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::error::AuthError;
use crate::principal::Principal;
use crate::token::TokenService;

const BEARER_PREFIX: &str = "Bearer ";

/// State required by the extractors, made available through `FromRef`.
#[derive(Debug, Clone)]
pub struct AuthState {
    pub tokens: Arc<TokenService>,
}

impl AuthState {
    pub fn new(tokens: Arc<TokenService>) -> Self {
        Self { tokens }
    }

    /// Resolves request headers to a principal.
    pub fn principal_from_headers(&self, headers: &HeaderMap) -> Option<Principal> {
        extract_bearer(headers).and_then(|token| self.tokens.authenticate(token))
    }
}

/// Token carried by an `Authorization: Bearer <token>` header.
///
/// Missing header, non-UTF-8 value, another scheme or an empty token all
/// yield `None`.
pub fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// The caller's identity, or `None` for anonymous callers.
#[derive(Debug, Clone)]
pub struct MaybePrincipal(pub Option<Principal>);

impl<S> FromRequestParts<S> for MaybePrincipal
where
    S: Send + Sync,
    AuthState: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = AuthState::from_ref(state);
        Ok(Self(auth_state.principal_from_headers(&parts.headers)))
    }
}

/// The caller's identity; rejects anonymous callers with 401.
#[derive(Debug, Clone)]
pub struct Authenticated(pub Principal);

impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
    AuthState: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = AuthState::from_ref(state);
        auth_state
            .principal_from_headers(&parts.headers)
            .map(Self)
            .ok_or_else(|| AuthError::unauthorized("Authentication required"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthConfig;
    use axum::body::Body;
    use axum::http::{HeaderValue, Request, StatusCode};
    use axum::routing::get;
    use axum::Router;
    use catalog_core::UserRole;
    use tower::ServiceExt;

    fn headers(value: &[u8]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_bytes(value).unwrap());
        headers
    }

    fn state() -> AuthState {
        let tokens =
            TokenService::new(&AuthConfig::with_secret("gate-test-secret-long-enough-value"))
                .unwrap();
        AuthState::new(Arc::new(tokens))
    }

    #[test]
    fn test_extract_bearer() {
        assert_eq!(extract_bearer(&headers(b"Bearer abc.def")), Some("abc.def"));
        assert_eq!(extract_bearer(&headers(b"Bearer   abc  ")), Some("abc"));
        assert_eq!(extract_bearer(&headers(b"Bearer ")), None);
        assert_eq!(extract_bearer(&headers(b"Basic dXNlcjpwYXNz")), None);
        assert_eq!(extract_bearer(&headers(b"bearer abc")), None);
        assert_eq!(extract_bearer(&headers(b"Bearer \xff")), None);
        assert_eq!(extract_bearer(&HeaderMap::new()), None);
    }

    #[test]
    fn test_invalid_token_is_anonymous() {
        let state = state();
        assert!(state.principal_from_headers(&headers(b"Bearer nonsense")).is_none());
        assert!(state.principal_from_headers(&HeaderMap::new()).is_none());
    }

    async fn whoami(MaybePrincipal(principal): MaybePrincipal) -> String {
        principal.map_or_else(|| "anonymous".to_string(), |p| p.email)
    }

    async fn mine(Authenticated(principal): Authenticated) -> String {
        principal.user_id.to_string()
    }

    fn app(state: AuthState) -> Router {
        Router::new()
            .route("/whoami", get(whoami))
            .route("/mine", get(mine))
            .with_state(state)
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_optional_principal_never_rejects() {
        let response = app(state())
            .oneshot(
                Request::get("/whoami")
                    .header(AUTHORIZATION, "Bearer garbage")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "anonymous");
    }

    #[tokio::test]
    async fn test_valid_token_reaches_handler() {
        let state = state();
        let issued = state.tokens.issue(42, "a@b.com", UserRole::User).unwrap();

        let response = app(state)
            .oneshot(
                Request::get("/mine")
                    .header(AUTHORIZATION, format!("Bearer {}", issued.token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "42");
    }

    #[tokio::test]
    async fn test_authenticated_rejects_anonymous() {
        let response = app(state())
            .oneshot(Request::get("/mine").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().contains_key("www-authenticate"));
    }
}
