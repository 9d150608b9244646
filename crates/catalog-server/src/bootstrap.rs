//! Startup data seeding.

use catalog_auth::PasswordHasher;
use catalog_core::{User, UserRole};
use catalog_storage::UserStorage;

use crate::config::AdminUserConfig;
use crate::error::ServerError;

/// Creates the configured admin account unless one with the same email
/// already exists. Returns whether a user was created.
pub async fn ensure_admin_user(
    users: &dyn UserStorage,
    admin: &AdminUserConfig,
) -> Result<bool, ServerError> {
    let email = admin.email.trim();
    let exists = users
        .exists_by_email(email)
        .await
        .map_err(|e| ServerError::Bootstrap(e.to_string()))?;
    if exists {
        tracing::info!(email = %email, "admin user already exists, skipping bootstrap");
        return Ok(false);
    }

    let password = admin.password.clone();
    let digest = tokio::task::spawn_blocking(move || PasswordHasher::default().hash(&password))
        .await
        .map_err(|e| ServerError::Bootstrap(e.to_string()))??;

    let user = User::new(
        email,
        digest,
        admin.first_name.trim(),
        admin.last_name.trim(),
        UserRole::Admin,
    );
    let user = users
        .add(user)
        .await
        .map_err(|e| ServerError::Bootstrap(e.to_string()))?;

    tracing::info!(user_id = user.id, email = %user.email, "admin user created");
    Ok(true)
}
