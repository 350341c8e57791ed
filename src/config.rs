use std::{env, time::Duration};

use secrecy::SecretString;

const DEV_JWT_SECRET: &str = "dev_secret_key_change_in_production";

/// Which CredentialVerifier strategy the login route uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthStrategy {
    /// Look the identity up in the store and compare the Argon2 hash.
    Local,
    /// Forward the credentials to the remote identity API.
    Remote,
}

impl AuthStrategy {
    fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "local" => AuthStrategy::Local,
            "remote" => AuthStrategy::Remote,
            other => {
                log::warn!("Unknown AUTH_STRATEGY '{}', falling back to remote", other);
                AuthStrategy::Remote
            }
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub mongo_conn_string: String,
    pub mongo_db_name: String,
    pub users_collection: String,
    pub quizzes_collection: String,
    pub web_server_host: String,
    pub web_server_port: u16,
    pub auth_strategy: AuthStrategy,
    pub backend_host: String,
    pub backend_port: u16,
    pub remote_auth_timeout_secs: u64,
    pub jwt_secret: SecretString,
    pub verify_remote_token: bool,
    pub bootstrap_admin_email: Option<String>,
    pub bootstrap_admin_password: Option<SecretString>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            mongo_conn_string: env::var("MONGO_CONN_STRING")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            mongo_db_name: env::var("MONGO_DB_NAME").unwrap_or_else(|_| "quiz_app".to_string()),
            users_collection: env::var("USERS_COLLECTION").unwrap_or_else(|_| "users".to_string()),
            quizzes_collection: env::var("QUIZZES_COLLECTION")
                .unwrap_or_else(|_| "quizzes".to_string()),
            web_server_host: env::var("WEB_SERVER_HOST")
                .unwrap_or_else(|_| "localhost".to_string()),
            web_server_port: env::var("WEB_SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            auth_strategy: env::var("AUTH_STRATEGY")
                .map(|s| AuthStrategy::parse(&s))
                .unwrap_or(AuthStrategy::Remote),
            backend_host: env::var("BACKEND_HOST").unwrap_or_else(|_| "localhost".to_string()),
            backend_port: env::var("BACKEND_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            remote_auth_timeout_secs: env::var("REMOTE_AUTH_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5),
            jwt_secret: SecretString::from(
                env::var("JWT_SECRET").unwrap_or_else(|_| DEV_JWT_SECRET.to_string()),
            ),
            verify_remote_token: env::var("VERIFY_REMOTE_TOKEN")
                .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
            bootstrap_admin_email: env::var("BOOTSTRAP_ADMIN_EMAIL")
                .ok()
                .filter(|v| !v.trim().is_empty()),
            bootstrap_admin_password: env::var("BOOTSTRAP_ADMIN_PASSWORD")
                .ok()
                .filter(|v| !v.is_empty())
                .map(SecretString::from),
        }
    }

    /// Full URL of the remote identity API login endpoint.
    pub fn remote_login_url(&self) -> String {
        format!(
            "http://{}:{}/api/auth/login",
            self.backend_host, self.backend_port
        )
    }

    pub fn remote_auth_timeout(&self) -> Duration {
        Duration::from_secs(self.remote_auth_timeout_secs)
    }

    /// Validate that production-critical configuration is set
    /// Panics if the shared signing secret is the placeholder or too short
    pub fn validate_for_production(&self) {
        use secrecy::ExposeSecret;

        let jwt_secret = self.jwt_secret.expose_secret();

        if jwt_secret == DEV_JWT_SECRET {
            panic!(
                "FATAL: JWT_SECRET is using default value! Set JWT_SECRET to the secret shared with the identity API."
            );
        }

        if jwt_secret.len() < 32 {
            panic!(
                "FATAL: JWT_SECRET is too short ({}). Must be at least 32 characters for security.",
                jwt_secret.len()
            );
        }

        if self.bootstrap_admin_email.is_some() && self.bootstrap_admin_password.is_none() {
            panic!("FATAL: BOOTSTRAP_ADMIN_EMAIL is set without BOOTSTRAP_ADMIN_PASSWORD.");
        }
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            mongo_conn_string: "mongodb://localhost:27017".to_string(),
            mongo_db_name: "quiz-admin-test".to_string(),
            users_collection: "users".to_string(),
            quizzes_collection: "quizzes".to_string(),
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
            auth_strategy: AuthStrategy::Local,
            backend_host: "127.0.0.1".to_string(),
            backend_port: 3000,
            remote_auth_timeout_secs: 2,
            jwt_secret: SecretString::from("test_jwt_secret_key".to_string()),
            verify_remote_token: false,
            bootstrap_admin_email: None,
            bootstrap_admin_password: None,
        }
    }
}
