use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};

use crate::{
    auth::PasswordService,
    errors::{AppError, AppResult},
    models::domain::{User, UserRole},
    repositories::UserRepository,
};

/// Seeds an admin identity for the local strategy when `email` is not yet known.
///
/// Returns `true` when a record was inserted. An existing record is left alone,
/// whatever its role.
pub async fn ensure_bootstrap_admin(
    users: &Arc<dyn UserRepository>,
    passwords: &PasswordService,
    email: &str,
    password: &SecretString,
) -> AppResult<bool> {
    if users.find_by_email(email).await?.is_some() {
        log::info!("Bootstrap admin already present, skipping");
        return Ok(false);
    }

    let hash = passwords.hash_password(password.expose_secret())?;
    let username = email.split('@').next().unwrap_or(email);
    let admin = User::new(username, email, &hash, UserRole::Admin);

    match users.insert(admin).await {
        Ok(user) => {
            log::info!("Seeded bootstrap admin user_id={}", user.user_id);
            Ok(true)
        }
        // another instance won the race to seed the same email
        Err(AppError::AlreadyExists(_)) => Ok(false),
        Err(e) => Err(e),
    }
}
