use std::{fmt, sync::Arc, time::Duration};

use actix_web::web;
use async_trait::async_trait;

use crate::{
    auth::{password::PasswordService, token::TokenCodec},
    errors::{AppError, AppResult, CredentialError},
    models::{
        domain::UserRole,
        dto::{request::RemoteLoginRequest, response::RemoteAuthResponse},
    },
    repositories::UserRepository,
};

/// Identity established by a successful credential check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    pub user_id: String,
    pub email: String,
    pub role: UserRole,
    /// Bearer token minted by the remote identity API, when that strategy is used.
    pub token: Option<String>,
}

#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    async fn verify(&self, email: &str, password: &str)
        -> Result<VerifiedIdentity, CredentialError>;
}

/// Verifies credentials and then admits only roles allowed on the admin surface.
///
/// A correct password for a plain `user` yields `InsufficientRole`, never a session.
pub async fn authenticate(
    verifier: &dyn CredentialVerifier,
    email: &str,
    password: &str,
) -> Result<VerifiedIdentity, CredentialError> {
    let identity = verifier.verify(email, password).await?;

    if !identity.role.is_privileged() {
        log::warn!(
            "Login refused for user_id={}: role '{}' is not allowed here",
            identity.user_id,
            identity.role
        );
        return Err(CredentialError::InsufficientRole);
    }

    Ok(identity)
}

pub struct LocalCredentialVerifier {
    users: Arc<dyn UserRepository>,
    passwords: PasswordService,
}

impl LocalCredentialVerifier {
    pub fn new(users: Arc<dyn UserRepository>, passwords: PasswordService) -> Self {
        Self { users, passwords }
    }
}

#[async_trait]
impl CredentialVerifier for LocalCredentialVerifier {
    async fn verify(
        &self,
        email: &str,
        password: &str,
    ) -> Result<VerifiedIdentity, CredentialError> {
        let user = self
            .users
            .find_by_email(email)
            .await
            .map_err(|e| {
                log::error!("Identity lookup failed: {}", e);
                CredentialError::StoreUnavailable
            })?
            .ok_or(CredentialError::NotFound)?;

        let passwords = self.passwords.clone();
        let password = password.to_string();
        let stored_hash = user.password_hash.clone();

        // keep argon2 off the request worker
        let outcome = web::block(move || passwords.verify_password(&password, &stored_hash)).await;
        password_outcome(outcome)?;

        Ok(VerifiedIdentity {
            user_id: user.user_id,
            email: user.email,
            role: user.role,
            token: None,
        })
    }
}

/// A verification task that never reported back is a service fault, not a mismatch.
fn password_outcome<E: fmt::Display>(outcome: Result<bool, E>) -> Result<(), CredentialError> {
    match outcome {
        Ok(true) => Ok(()),
        Ok(false) => Err(CredentialError::BadPassword),
        Err(e) => {
            log::error!("Password verification task failed: {}", e);
            Err(CredentialError::StoreUnavailable)
        }
    }
}

/// Delegates the check to the identity API's `POST /api/auth/login`.
pub struct RemoteCredentialVerifier {
    client: reqwest::Client,
    login_url: String,
    token_codec: Option<TokenCodec>,
}

impl RemoteCredentialVerifier {
    pub fn new(login_url: impl Into<String>, timeout: Duration) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::InternalError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            login_url: login_url.into(),
            token_codec: None,
        })
    }

    /// Also decode the returned token and require its claims to agree with the body.
    pub fn with_token_codec(mut self, codec: TokenCodec) -> Self {
        self.token_codec = Some(codec);
        self
    }

    fn check_token(&self, body: &RemoteAuthResponse) -> Result<(), CredentialError> {
        let Some(codec) = &self.token_codec else {
            return Ok(());
        };

        let claims = codec.decode(&body.token).map_err(|e| {
            log::warn!("Token returned by identity API failed verification: {}", e);
            CredentialError::MalformedResponse
        })?;

        for (claim, expected) in [("role", &body.role), ("user_id", &body.user_id)] {
            if let Some(value) = claims.get(claim).and_then(|v| v.as_str()) {
                if value != expected {
                    log::warn!("Token claim '{}' disagrees with the login response", claim);
                    return Err(CredentialError::MalformedResponse);
                }
            }
        }

        Ok(())
    }
}

#[async_trait]
impl CredentialVerifier for RemoteCredentialVerifier {
    async fn verify(
        &self,
        email: &str,
        password: &str,
    ) -> Result<VerifiedIdentity, CredentialError> {
        let response = self
            .client
            .post(&self.login_url)
            .json(&RemoteLoginRequest { email, password })
            .send()
            .await
            .map_err(|e| {
                log::error!("Identity API call failed: {}", e);
                CredentialError::RemoteUnavailable
            })?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            log::warn!("Identity API refused login: status={} body={}", status, body);
            return Err(CredentialError::RemoteRejected);
        }

        let body: RemoteAuthResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                log::error!("Identity API response timed out: {}", e);
                CredentialError::RemoteUnavailable
            } else {
                log::warn!("Identity API response could not be parsed: {}", e);
                CredentialError::MalformedResponse
            }
        })?;

        let role: UserRole = body.role.parse().map_err(|e| {
            log::warn!("Identity API returned {}", e);
            CredentialError::MalformedResponse
        })?;

        if body.user_id.is_empty() {
            log::warn!("Identity API returned an empty user_id");
            return Err(CredentialError::MalformedResponse);
        }

        self.check_token(&body)?;

        Ok(VerifiedIdentity {
            user_id: body.user_id,
            email: email.to_string(),
            role,
            token: Some(body.token).filter(|t| !t.is_empty()),
        })
    }
}
