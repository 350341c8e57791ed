use serde::Deserialize;

/// Success body of the remote identity API's `POST /api/auth/login`.
///
/// Extra fields (username, avatar, score) are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteAuthResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub token: String,
    pub role: String,
    pub user_id: String,
}
