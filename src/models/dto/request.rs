use serde::{Deserialize, Serialize};
use validator::Validate;

/// `POST /login` form body. Missing fields deserialize as empty so they reach validation.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// `POST /promote-user` and `POST /demote-user` form body.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct RoleChangeRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 254, message = "Target email is required"))]
    pub email: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct CreateQuizRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[serde(default)]
    #[validate(length(min = 1, max = 100))]
    pub theme: String,

    #[serde(default)]
    #[validate(length(min = 1, max = 50))]
    pub difficulty: String,
}

/// JSON body sent to the remote identity API.
#[derive(Debug, Serialize)]
pub struct RemoteLoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}
