#[cfg(test)]
pub mod fixtures {
    use std::sync::Arc;

    use crate::{
        app_state::AppState,
        auth::{CredentialVerifier, PasswordService},
        config::Config,
        errors::CredentialError,
        models::domain::{User, UserRole},
        repositories::{MockQuizRepository, MockUserRepository},
        test_utils::test_helpers::FixedVerifier,
        views::JsonViewRenderer,
    };

    pub const TEST_PASSWORD: &str = "correct-password";

    /// A stored identity whose password hash matches [`TEST_PASSWORD`].
    pub fn hashed_user(email: &str, role: UserRole) -> User {
        let hash = PasswordService::new()
            .hash_password(TEST_PASSWORD)
            .expect("hashing should succeed");
        let username = email.split('@').next().unwrap_or(email);
        User::new(username, email, &hash, role)
    }

    fn app_state(
        verifier: Arc<dyn CredentialVerifier>,
        users: MockUserRepository,
        quizzes: MockQuizRepository,
    ) -> Arc<AppState> {
        Arc::new(AppState::from_parts(
            Config::test_config(),
            verifier,
            Arc::new(users),
            Arc::new(quizzes),
            Arc::new(JsonViewRenderer),
        ))
    }

    pub fn app_state_with_verifier(verifier: FixedVerifier) -> Arc<AppState> {
        app_state(
            Arc::new(verifier),
            MockUserRepository::new(),
            MockQuizRepository::new(),
        )
    }

    pub fn app_state_with_users(users: MockUserRepository) -> Arc<AppState> {
        app_state(
            Arc::new(FixedVerifier::failing(CredentialError::NotFound)),
            users,
            MockQuizRepository::new(),
        )
    }

    pub fn app_state_with_quizzes(quizzes: MockQuizRepository) -> Arc<AppState> {
        app_state(
            Arc::new(FixedVerifier::failing(CredentialError::NotFound)),
            MockUserRepository::new(),
            quizzes,
        )
    }
}

#[cfg(test)]
pub mod test_helpers {
    use async_trait::async_trait;

    use crate::{
        auth::{CredentialVerifier, VerifiedIdentity},
        errors::CredentialError,
        models::domain::UserRole,
    };

    /// Verifier that answers every credential check the same way.
    pub struct FixedVerifier(pub Result<VerifiedIdentity, CredentialError>);

    impl FixedVerifier {
        pub fn identity(user_id: &str, role: UserRole, token: Option<&str>) -> Self {
            Self(Ok(VerifiedIdentity {
                user_id: user_id.to_string(),
                email: "a@x.com".to_string(),
                role,
                token: token.map(str::to_string),
            }))
        }

        pub fn failing(error: CredentialError) -> Self {
            Self(Err(error))
        }
    }

    #[async_trait]
    impl CredentialVerifier for FixedVerifier {
        async fn verify(&self, _: &str, _: &str) -> Result<VerifiedIdentity, CredentialError> {
            self.0.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use crate::{auth::PasswordService, models::domain::UserRole};

    #[test]
    fn test_hashed_user_matches_test_password() {
        let user = hashed_user("root@x.com", UserRole::Admin);
        assert_eq!(user.username, "root");
        assert!(PasswordService::new().verify_password(TEST_PASSWORD, &user.password_hash));
    }
}
