use crate::application_port::*;
use crate::domain_model::*;
use crate::logger::*;

/// Relies on the HTTP client's cookie jar to carry the refresh session.
///
/// Nothing is stored here: the refresh body is empty and a restart means a
/// new login.
#[derive(Debug, Default)]
pub struct TransportCredentialBackend;

impl TransportCredentialBackend {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl CredentialBackend for TransportCredentialBackend {
    fn name(&self) -> &'static str {
        "transport"
    }

    async fn refresh_request(&self) -> Result<RefreshRequest, RefreshError> {
        Ok(RefreshRequest::default())
    }

    async fn persist_access_token(&self, _token: &AccessToken) {}

    async fn persist_session(&self, session: &Session) {
        if session.refresh_token.is_some() {
            debug!("ignoring refresh token in body, session cookie is used instead");
        }
    }

    async fn load_session(&self) -> Option<Session> {
        None
    }

    async fn clear(&self) {}
}
