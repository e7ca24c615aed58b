use super::*;
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use crate::logger::*;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub const LOGIN_PATH: &str = "/auth/login";
pub const LOGOUT_PATH: &str = "/auth/logout";

pub struct RealApiClient {
    transport: Arc<dyn HttpTransport>,
    store: Arc<CredentialStore>,
    authenticator: RequestAuthenticator,
    terminator: Arc<SessionTerminator>,
    coordinator: RefreshCoordinator,
}

impl RealApiClient {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        backend: Arc<dyn CredentialBackend>,
        navigator: Arc<dyn Navigator>,
        login_route: &str,
    ) -> Self {
        let store = Arc::new(CredentialStore::new(backend));
        let terminator = Arc::new(SessionTerminator::new(
            store.clone(),
            navigator,
            login_route,
        ));
        let coordinator =
            RefreshCoordinator::new(transport.clone(), store.clone(), terminator.clone());
        Self {
            authenticator: RequestAuthenticator::new(store.clone()),
            transport,
            store,
            terminator,
            coordinator,
        }
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.store
    }

    pub fn is_authenticated(&self) -> bool {
        self.store.access_token().is_some()
    }

    /// Like [`ApiClient::send`] but gives up when `cancel` fires.
    ///
    /// A refresh already started on behalf of this request keeps running.
    pub async fn send_cancellable(
        &self,
        request: ApiRequest,
        cancel: CancellationToken,
    ) -> Result<ApiResponse, ApiError> {
        let request_id = request.id;
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(%request_id, "request cancelled");
                Err(ApiError::Cancelled)
            }
            result = self.coordinator.execute(request) => result,
        }
    }
}

#[async_trait::async_trait]
impl ApiClient for RealApiClient {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        self.coordinator.execute(request).await
    }
}

#[async_trait::async_trait]
impl SessionService for RealApiClient {
    async fn login(&self, input: LoginInput) -> Result<(), ApiError> {
        let request = ApiRequest::post(LOGIN_PATH)
            .with_json(&input)
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        let response = self.transport.send(request).await?;
        if !response.is_success() {
            warn!(status = response.status, "login rejected");
            return Err(ApiError::status(&response));
        }
        let tokens: LoginResponse = response
            .decode()
            .map_err(|e| ApiError::Decode(e.to_string()))?;

        let session = Session::new(tokens.access_token, tokens.refresh_token);
        self.store.begin_session(&session).await;
        self.terminator.rearm();
        info!(username = %input.username, backend = self.store.backend_name(), "logged in");
        Ok(())
    }

    async fn logout(&self) {
        let (request, _) = self.authenticator.authenticate(ApiRequest::post(LOGOUT_PATH));
        match self.transport.send(request).await {
            Ok(response) if response.is_success() => {}
            Ok(response) => warn!(status = response.status, "server logout failed"),
            Err(e) => warn!(error = %e, "server logout failed"),
        }
        self.terminator.mark_ended();
        self.store.clear().await;
        info!("logged out");
    }

    async fn restore(&self) -> bool {
        let restored = self.store.restore().await;
        if restored {
            self.terminator.rearm();
        }
        restored
    }
}
