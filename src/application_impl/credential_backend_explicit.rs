use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use crate::logger::*;
use std::sync::Arc;

/// Keeps both tokens in durable storage and sends the refresh token in the
/// refresh body. Used where the transport carries no session cookie.
pub struct ExplicitTokenBackend {
    store: Arc<dyn DurableCredentialStore>,
}

impl ExplicitTokenBackend {
    pub fn new(store: Arc<dyn DurableCredentialStore>) -> Self {
        Self { store }
    }

    async fn write(&self, key: &str, value: &str) {
        if let Err(e) = self.store.write(key, value).await {
            warn!(key, error = %e, "failed to persist credential");
        }
    }

    async fn remove(&self, key: &str) {
        if let Err(e) = self.store.remove(key).await {
            warn!(key, error = %e, "failed to remove credential");
        }
    }

    async fn read(&self, key: &str) -> Option<String> {
        match self.store.read(key).await {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "failed to read credential");
                None
            }
        }
    }
}

#[async_trait::async_trait]
impl CredentialBackend for ExplicitTokenBackend {
    fn name(&self) -> &'static str {
        "explicit"
    }

    async fn refresh_request(&self) -> Result<RefreshRequest, RefreshError> {
        let token = self
            .read(REFRESH_TOKEN_KEY)
            .await
            .ok_or(RefreshError::MissingRefreshToken)?;
        Ok(RefreshRequest {
            refresh_token: Some(RefreshToken(token)),
        })
    }

    async fn persist_access_token(&self, token: &AccessToken) {
        self.write(ACCESS_TOKEN_KEY, &token.0).await;
    }

    async fn persist_session(&self, session: &Session) {
        match &session.access_token {
            Some(token) => self.write(ACCESS_TOKEN_KEY, &token.0).await,
            None => self.remove(ACCESS_TOKEN_KEY).await,
        }
        match &session.refresh_token {
            Some(token) => self.write(REFRESH_TOKEN_KEY, &token.0).await,
            None => self.remove(REFRESH_TOKEN_KEY).await,
        }
    }

    async fn load_session(&self) -> Option<Session> {
        let access_token = self.read(ACCESS_TOKEN_KEY).await.map(AccessToken)?;
        let refresh_token = self.read(REFRESH_TOKEN_KEY).await.map(RefreshToken);
        Some(Session::new(access_token, refresh_token))
    }

    async fn clear(&self) {
        self.remove(ACCESS_TOKEN_KEY).await;
        self.remove(REFRESH_TOKEN_KEY).await;
    }
}
