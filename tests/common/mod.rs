#![allow(dead_code)]

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use secrecy::SecretString;
use tokio::sync::{Barrier, RwLock};

use quiz_admin::{
    app_state::AppState,
    auth::{LocalCredentialVerifier, PasswordService},
    config::{AuthStrategy, Config},
    errors::{AppError, AppResult},
    models::domain::{Quiz, User, UserRole},
    repositories::{QuizRepository, UserRepository},
    views::JsonViewRenderer,
};

pub const PASSWORD: &str = "correct";
pub const TEST_SECRET: &str = "integration_test_secret_key_0123456789";

#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    users_by_email: Arc<RwLock<HashMap<String, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn role_of(&self, email: &str) -> Option<UserRole> {
        self.users_by_email.read().await.get(email).map(|u| u.role)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let users = self.users_by_email.read().await;
        Ok(users.get(email).cloned())
    }

    async fn compare_and_set_role(
        &self,
        email: &str,
        expected_role: UserRole,
        new_role: UserRole,
    ) -> AppResult<u64> {
        let mut users = self.users_by_email.write().await;

        match users.get_mut(email) {
            Some(user) if user.role == expected_role => {
                user.role = new_role;
                Ok(1)
            }
            _ => Ok(0),
        }
    }

    async fn insert(&self, user: User) -> AppResult<User> {
        let mut users = self.users_by_email.write().await;

        if users.contains_key(&user.email) {
            return Err(AppError::AlreadyExists(format!(
                "User with email '{}' already exists",
                user.email
            )));
        }

        users.insert(user.email.clone(), user.clone());
        Ok(user)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

/// Holds every `find_by_email` at a shared barrier after the read, so
/// concurrent callers all observe the same record before any of them writes.
#[derive(Clone)]
pub struct LockstepUserRepository {
    inner: InMemoryUserRepository,
    barrier: Arc<Barrier>,
}

impl LockstepUserRepository {
    pub fn new(inner: InMemoryUserRepository, parties: usize) -> Self {
        Self {
            inner,
            barrier: Arc::new(Barrier::new(parties)),
        }
    }
}

#[async_trait]
impl UserRepository for LockstepUserRepository {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let user = self.inner.find_by_email(email).await?;
        self.barrier.wait().await;
        Ok(user)
    }

    async fn compare_and_set_role(
        &self,
        email: &str,
        expected_role: UserRole,
        new_role: UserRole,
    ) -> AppResult<u64> {
        self.inner
            .compare_and_set_role(email, expected_role, new_role)
            .await
    }

    async fn insert(&self, user: User) -> AppResult<User> {
        self.inner.insert(user).await
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct InMemoryQuizRepository {
    quizzes: Arc<RwLock<HashMap<String, Quiz>>>,
}

impl InMemoryQuizRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn all(&self) -> Vec<Quiz> {
        self.quizzes.read().await.values().cloned().collect()
    }
}

#[async_trait]
impl QuizRepository for InMemoryQuizRepository {
    async fn create(&self, quiz: Quiz) -> AppResult<Quiz> {
        let mut quizzes = self.quizzes.write().await;

        if quizzes.contains_key(&quiz.quiz_id) {
            return Err(AppError::AlreadyExists(format!(
                "Quiz with id '{}' already exists",
                quiz.quiz_id
            )));
        }

        quizzes.insert(quiz.quiz_id.clone(), quiz.clone());
        Ok(quiz)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

pub fn test_config(strategy: AuthStrategy) -> Config {
    Config {
        mongo_conn_string: "mongodb://localhost:27017".to_string(),
        mongo_db_name: "quiz-admin-it".to_string(),
        users_collection: "users".to_string(),
        quizzes_collection: "quizzes".to_string(),
        web_server_host: "127.0.0.1".to_string(),
        web_server_port: 0,
        auth_strategy: strategy,
        backend_host: "127.0.0.1".to_string(),
        backend_port: 1,
        remote_auth_timeout_secs: 2,
        jwt_secret: SecretString::from(TEST_SECRET.to_string()),
        verify_remote_token: false,
        bootstrap_admin_email: None,
        bootstrap_admin_password: None,
    }
}

/// Stores `email` with role `role` and the password [`PASSWORD`].
pub async fn seed_user(users: &InMemoryUserRepository, email: &str, role: UserRole) -> User {
    let hash = PasswordService::new()
        .hash_password(PASSWORD)
        .expect("hashing should succeed");
    let username = email.split('@').next().unwrap_or(email);

    users
        .insert(User::new(username, email, &hash, role))
        .await
        .expect("seeding should succeed")
}

/// Full application state over in-memory stores with the local credential strategy.
pub fn local_app_state(
    users: &InMemoryUserRepository,
    quizzes: &InMemoryQuizRepository,
) -> Arc<AppState> {
    let user_repo: Arc<dyn UserRepository> = Arc::new(users.clone());
    let verifier = LocalCredentialVerifier::new(Arc::clone(&user_repo), PasswordService::new());

    Arc::new(AppState::from_parts(
        test_config(AuthStrategy::Local),
        Arc::new(verifier),
        user_repo,
        Arc::new(quizzes.clone()),
        Arc::new(JsonViewRenderer),
    ))
}
