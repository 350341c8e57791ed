//! Salted, slow password hashing for the local credential strategy.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::errors::{AppError, AppResult};

#[derive(Clone, Default)]
pub struct PasswordService {
    argon2: Argon2<'static>,
}

impl PasswordService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hash a password into a PHC string with a fresh random salt.
    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::InternalError(format!("Password hashing failed: {}", e)))
    }

    /// Constant-time comparison of `password` against a stored PHC hash.
    ///
    /// A stored value that is not a parseable PHC string never matches.
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> bool {
        let parsed = match PasswordHash::new(stored_hash) {
            Ok(parsed) => parsed,
            Err(_) => {
                log::warn!("Stored password hash is not a supported PHC string");
                return false;
            }
        };

        self.argon2
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let service = PasswordService::new();
        let hash = service.hash_password("correct horse").unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(service.verify_password("correct horse", &hash));
        assert!(!service.verify_password("wrong horse", &hash));
    }

    #[test]
    fn test_hashes_are_salted() {
        let service = PasswordService::new();
        let first = service.hash_password("same").unwrap();
        let second = service.hash_password("same").unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn test_unparseable_hash_never_matches() {
        let service = PasswordService::new();
        assert!(!service.verify_password("plain", "plain"));
        assert!(!service.verify_password("", ""));
    }
}
