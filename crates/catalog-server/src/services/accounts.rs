//! Registration and sign-in.

use std::sync::Arc;

use catalog_auth::{IssuedToken, PasswordHasher, TokenService};
use catalog_core::{Failure, Outcome, User, UserRole};
use catalog_storage::UserStorage;
use serde::Serialize;
use time::OffsetDateTime;

use super::run_blocking;
use crate::validation::{LoginRequest, RegisterRequest};

const DUPLICATE_EMAIL: &str = "User with this email already exists";
const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Token payload returned by register and login.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub email: String,
    pub full_name: String,
    pub role: UserRole,
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
}

impl AuthResponse {
    fn new(user: &User, issued: IssuedToken) -> Self {
        Self {
            token: issued.token,
            email: user.email.clone(),
            full_name: user.full_name(),
            role: user.role,
            expires_at: issued.expires_at,
        }
    }
}

#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserStorage>,
    tokens: Arc<TokenService>,
    hasher: PasswordHasher,
}

impl AccountService {
    pub fn new(users: Arc<dyn UserStorage>, tokens: Arc<TokenService>) -> Self {
        Self {
            users,
            tokens,
            hasher: PasswordHasher::default(),
        }
    }

    pub async fn register(&self, req: RegisterRequest) -> Outcome<AuthResponse> {
        req.validate()?;
        let email = req.email.trim().to_string();

        if self.users.exists_by_email(&email).await? {
            return Err(Failure::conflict(DUPLICATE_EMAIL));
        }

        let hasher = self.hasher;
        let password = req.password;
        let digest = run_blocking(move || hasher.hash(&password)).await??;

        let user = User::new(
            email,
            digest,
            req.first_name.trim(),
            req.last_name.trim(),
            UserRole::User,
        );
        let user = match self.users.add(user).await {
            Ok(user) => user,
            // Lost a race with a concurrent registration
            Err(e) if e.is_already_exists() => return Err(Failure::conflict(DUPLICATE_EMAIL)),
            Err(e) => return Err(e.into()),
        };

        tracing::info!(user_id = user.id, "user registered");
        let issued = self.tokens.issue(user.id, &user.email, user.role)?;
        Ok(AuthResponse::new(&user, issued))
    }

    /// Unknown email, wrong password and inactive accounts all fail with the
    /// same message.
    pub async fn login(&self, req: LoginRequest) -> Outcome<AuthResponse> {
        req.validate()?;

        let Some(user) = self.users.find_by_email(req.email.trim()).await? else {
            tracing::debug!("login for unknown email");
            return Err(Failure::unauthorized(INVALID_CREDENTIALS));
        };

        let hasher = self.hasher;
        let password = req.password;
        let digest = user.password_hash.clone();
        let matches = run_blocking(move || hasher.verify(&password, &digest)).await?;

        if !matches || !user.can_sign_in() {
            tracing::debug!(user_id = user.id, active = user.can_sign_in(), "login rejected");
            return Err(Failure::unauthorized(INVALID_CREDENTIALS));
        }

        let issued = self.tokens.issue(user.id, &user.email, user.role)?;
        tracing::info!(user_id = user.id, "user signed in");
        Ok(AuthResponse::new(&user, issued))
    }
}
