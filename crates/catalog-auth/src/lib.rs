//! # catalog-auth
//!
//! Authentication for the catalog API.
//!
//! This crate provides:
//! - Salted PBKDF2 credential digests with constant-time verification
//! - HS256 identity token issuance and validation
//! - Axum extractors that turn a bearer header into an optional principal
//!
//! ## Modules
//!
//! - [`config`] - Token signing configuration
//! - [`password`] - Credential hasher
//! - [`token`] - Identity token service and clocks
//! - [`middleware`] - Request authentication gate
//!
//! Token validation never fails a request by itself: an absent or bad token
//! yields an anonymous caller, and handlers that need an identity ask for
//! [`Authenticated`] explicitly.

pub mod config;
pub mod error;
pub mod middleware;
pub mod password;
pub mod principal;
pub mod token;

pub use config::{AuthConfig, SigningSecret};
pub use error::AuthError;
pub use middleware::{AuthState, Authenticated, MaybePrincipal, extract_bearer};
pub use password::{PBKDF2_ITERATIONS, PasswordHasher, hash_password, verify_password};
pub use principal::Principal;
pub use token::{
    FixedClock, IdentityClaims, IssuedToken, ManualClock, SystemClock, TokenClock, TokenError,
    TokenService,
};
