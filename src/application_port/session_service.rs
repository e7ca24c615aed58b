use super::ApiError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

#[async_trait::async_trait]
pub trait SessionService: Send + Sync {
    async fn login(&self, input: LoginInput) -> Result<(), ApiError>;
    /// Ends the session locally even when the server call fails.
    async fn logout(&self);
    /// Loads persisted credentials. Returns whether a session was found.
    async fn restore(&self) -> bool;
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LoginResponse {
    pub access_token: crate::domain_model::AccessToken,
    #[serde(default)]
    pub refresh_token: Option<crate::domain_model::RefreshToken>,
}
