use super::RefreshError;
use crate::domain_model::*;
use serde::{Deserialize, Serialize};

/// Body of `POST /auth/refresh`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<RefreshToken>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub access_token: AccessToken,
}

/// Where tokens live between requests and how the refresh call proves the session.
///
/// Persistence methods are best effort: implementations log failures and
/// carry on, since losing them only costs the user a login.
#[async_trait::async_trait]
pub trait CredentialBackend: Send + Sync {
    fn name(&self) -> &'static str;
    async fn refresh_request(&self) -> Result<RefreshRequest, RefreshError>;
    async fn persist_access_token(&self, token: &AccessToken);
    async fn persist_session(&self, session: &Session);
    async fn load_session(&self) -> Option<Session>;
    async fn clear(&self);
}
