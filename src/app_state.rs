use std::sync::Arc;

use crate::{
    auth::{
        CredentialVerifier, LocalCredentialVerifier, PasswordService, RemoteCredentialVerifier,
        SessionIssuer, TokenCodec,
    },
    config::{AuthStrategy, Config},
    db::Database,
    errors::AppResult,
    repositories::{MongoQuizRepository, MongoUserRepository, QuizRepository, UserRepository},
    services::{ensure_bootstrap_admin, QuizService, RoleTransitionService},
    views::{JsonViewRenderer, ViewRenderer},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub verifier: Arc<dyn CredentialVerifier>,
    pub role_service: Arc<RoleTransitionService>,
    pub quiz_service: Arc<QuizService>,
    pub renderer: Arc<dyn ViewRenderer>,
    pub session_issuer: SessionIssuer,
    /// Absent when the state is assembled without a live store.
    pub db: Option<Database>,
}

impl AppState {
    pub async fn new(config: Config, db: &Database) -> AppResult<Self> {
        let users: Arc<dyn UserRepository> =
            Arc::new(MongoUserRepository::new(db, &config.users_collection));
        users.ensure_indexes().await?;

        let quizzes: Arc<dyn QuizRepository> =
            Arc::new(MongoQuizRepository::new(db, &config.quizzes_collection));
        quizzes.ensure_indexes().await?;

        let verifier = build_verifier(&config, &users).await?;

        let mut state = Self::from_parts(
            config,
            verifier,
            users,
            quizzes,
            Arc::new(JsonViewRenderer),
        );
        state.db = Some(db.clone());

        Ok(state)
    }

    pub fn from_parts(
        config: Config,
        verifier: Arc<dyn CredentialVerifier>,
        users: Arc<dyn UserRepository>,
        quizzes: Arc<dyn QuizRepository>,
        renderer: Arc<dyn ViewRenderer>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            verifier,
            role_service: Arc::new(RoleTransitionService::new(users)),
            quiz_service: Arc::new(QuizService::new(quizzes)),
            renderer,
            session_issuer: SessionIssuer,
            db: None,
        }
    }
}

async fn build_verifier(
    config: &Config,
    users: &Arc<dyn UserRepository>,
) -> AppResult<Arc<dyn CredentialVerifier>> {
    match config.auth_strategy {
        AuthStrategy::Local => {
            let passwords = PasswordService::new();

            if let (Some(email), Some(password)) = (
                config.bootstrap_admin_email.as_deref(),
                config.bootstrap_admin_password.as_ref(),
            ) {
                ensure_bootstrap_admin(users, &passwords, email, password).await?;
            }

            log::info!("Verifying credentials against the local identity store");
            Ok(Arc::new(LocalCredentialVerifier::new(
                Arc::clone(users),
                passwords,
            )))
        }
        AuthStrategy::Remote => {
            if config.bootstrap_admin_email.is_some() {
                log::warn!("BOOTSTRAP_ADMIN_EMAIL is ignored with the remote auth strategy");
            }

            let mut verifier = RemoteCredentialVerifier::new(
                config.remote_login_url(),
                config.remote_auth_timeout(),
            )?;
            if config.verify_remote_token {
                verifier = verifier.with_token_codec(TokenCodec::new(&config.jwt_secret));
            }

            log::info!(
                "Delegating credential checks to {}",
                config.remote_login_url()
            );
            Ok(Arc::new(verifier))
        }
    }
}
