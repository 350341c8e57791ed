use actix_web::{
    http::{header::LOCATION, StatusCode},
    HttpResponse, ResponseError,
};
use serde::Serialize;
use thiserror::Error;

/// Entry point every denied request is sent back to.
pub const LOGIN_PATH: &str = "/login";

#[derive(Debug, Clone, Error)]
pub enum AppError {
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),

    #[error(transparent)]
    Authorization(#[from] AuthorizationDenied),

    #[error(transparent)]
    RoleTransition(#[from] RoleTransitionError),
}

impl AppError {
    fn error_code(&self) -> &'static str {
        match self {
            AppError::AlreadyExists(_) => "ALREADY_EXISTS",
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::DatabaseError(_) => "DATABASE_ERROR",
            AppError::InternalError(_) => "INTERNAL_ERROR",
            AppError::Authorization(_) => "AUTHORIZATION_DENIED",
            AppError::RoleTransition(e) => e.error_code(),
        }
    }

    /// Message safe to hand to a client. Store and internal details stay in the logs.
    fn public_message(&self) -> String {
        match self {
            AppError::DatabaseError(_) | AppError::InternalError(_) => {
                "Internal server error".to_string()
            }
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
    pub status: u16,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::AlreadyExists(_) => StatusCode::CONFLICT,
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Authorization(e) => e.status_code(),
            AppError::RoleTransition(e) => e.status_code(),
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Authorization(e) => e.error_response(),
            AppError::RoleTransition(e) => e.error_response(),
            AppError::DatabaseError(detail) | AppError::InternalError(detail) => {
                log::error!("{}: {}", self.error_code(), detail);
                HttpResponse::build(self.status_code()).json(ErrorResponse {
                    error: self.public_message(),
                    code: self.error_code(),
                    status: self.status_code().as_u16(),
                })
            }
            _ => HttpResponse::build(self.status_code()).json(ErrorResponse {
                error: self.public_message(),
                code: self.error_code(),
                status: self.status_code().as_u16(),
            }),
        }
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        AppError::DatabaseError(err.to_string())
    }
}

impl From<mongodb::bson::ser::Error> for AppError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        AppError::InternalError(format!("BSON serialization error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// Why a credential check did not produce a usable identity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    #[error("no identity registered for this email")]
    NotFound,

    #[error("password does not match")]
    BadPassword,

    #[error("identity role is not allowed on the administrative surface")]
    InsufficientRole,

    #[error("remote identity API is unreachable")]
    RemoteUnavailable,

    #[error("remote identity API rejected the credentials")]
    RemoteRejected,

    #[error("remote identity API returned an unreadable response")]
    MalformedResponse,

    #[error("identity store is unavailable")]
    StoreUnavailable,
}

impl CredentialError {
    /// Fixed message shown on the login view. Never reveals which half of the pair was wrong.
    pub fn user_message(&self) -> &'static str {
        match self {
            CredentialError::NotFound
            | CredentialError::BadPassword
            | CredentialError::RemoteRejected => "Invalid credentials or access denied",
            CredentialError::InsufficientRole => {
                "Access denied: insufficient role for this interface"
            }
            CredentialError::RemoteUnavailable | CredentialError::StoreUnavailable => {
                "Authentication service unavailable, please retry later"
            }
            CredentialError::MalformedResponse => "Could not read the authentication response",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token is signed with an unexpected algorithm")]
    UnexpectedAlgorithm,

    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token is malformed")]
    MalformedToken,

    #[error("token claims are not a key/value mapping")]
    ClaimsExtractionFailed,
}

/// A guard refused the request. Always answered with a redirect to the login page.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthorizationDenied {
    #[error("missing session attribute '{0}'")]
    MissingAttribute(&'static str),

    #[error("session role is below the required role")]
    InsufficientRole,
}

impl AuthorizationDenied {
    pub fn redirect_target(&self) -> &'static str {
        LOGIN_PATH
    }
}

impl ResponseError for AuthorizationDenied {
    fn status_code(&self) -> StatusCode {
        StatusCode::SEE_OTHER
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::SeeOther()
            .insert_header((LOCATION, self.redirect_target()))
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoleTransitionError {
    #[error("You cannot change your own role")]
    SelfModification,

    #[error("User not found")]
    TargetNotFound,

    #[error("The role of an administrator cannot be changed")]
    AdminImmutable,

    #[error("User already has the role '{0}'")]
    AlreadyAtTarget(&'static str),

    #[error("The user record changed concurrently, please retry")]
    StoreConflict,
}

impl RoleTransitionError {
    fn error_code(&self) -> &'static str {
        match self {
            RoleTransitionError::SelfModification => "SELF_MODIFICATION",
            RoleTransitionError::TargetNotFound => "TARGET_NOT_FOUND",
            RoleTransitionError::AdminImmutable => "ADMIN_IMMUTABLE",
            RoleTransitionError::AlreadyAtTarget(_) => "ALREADY_AT_TARGET",
            RoleTransitionError::StoreConflict => "STORE_CONFLICT",
        }
    }
}

impl ResponseError for RoleTransitionError {
    fn status_code(&self) -> StatusCode {
        match self {
            RoleTransitionError::SelfModification | RoleTransitionError::AdminImmutable => {
                StatusCode::FORBIDDEN
            }
            RoleTransitionError::TargetNotFound => StatusCode::NOT_FOUND,
            RoleTransitionError::AlreadyAtTarget(_) => StatusCode::BAD_REQUEST,
            RoleTransitionError::StoreConflict => StatusCode::CONFLICT,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .content_type("text/plain; charset=utf-8")
            .body(self.to_string())
    }
}
