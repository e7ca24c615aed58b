use super::{CredentialStore, RequestAuthenticator, SessionTerminator};
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use crate::logger::*;
use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};
use std::sync::{Arc, Mutex, PoisonError};

pub const REFRESH_PATH: &str = "/auth/refresh";

type SharedRefresh = Shared<BoxFuture<'static, Result<AccessToken, RefreshError>>>;

/// Drives one request through send, at most one refresh, and at most one replay.
///
/// Concurrent 401s share a single refresh. The refresh runs in its own task,
/// so a caller that stops waiting does not cancel it for the others.
pub struct RefreshCoordinator {
    transport: Arc<dyn HttpTransport>,
    store: Arc<CredentialStore>,
    authenticator: RequestAuthenticator,
    terminator: Arc<SessionTerminator>,
    in_flight: Arc<Mutex<Option<SharedRefresh>>>,
}

impl RefreshCoordinator {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        store: Arc<CredentialStore>,
        terminator: Arc<SessionTerminator>,
    ) -> Self {
        Self {
            authenticator: RequestAuthenticator::new(store.clone()),
            transport,
            store,
            terminator,
            in_flight: Arc::new(Mutex::new(None)),
        }
    }

    pub async fn execute(&self, mut request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let (outbound, epoch) = self.authenticator.authenticate(request.clone());
        let response = self.transport.send(outbound).await?;
        if !response.is_unauthorized() {
            return Ok(response);
        }
        if request.retried {
            debug!(request_id = %request.id, path = %request.path, "401 on retried request");
            return Err(ApiError::unauthorized(&response));
        }

        request.retried = true;
        debug!(request_id = %request.id, path = %request.path, "401, refreshing access token");
        self.refresh_after(epoch).await?;

        let request_id = request.id;
        let (outbound, _) = self.authenticator.authenticate(request);
        let replayed = self.transport.send(outbound).await?;
        if replayed.is_unauthorized() {
            warn!(request_id = %request_id, "replay rejected after refresh");
            return Err(ApiError::unauthorized(&replayed));
        }
        Ok(replayed)
    }

    /// Obtains a token newer than `stale`, joining a refresh already in flight.
    pub async fn refresh_after(&self, stale: TokenEpoch) -> Result<AccessToken, RefreshError> {
        let pending = {
            let mut slot = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
            match slot.clone() {
                Some(pending) => pending,
                None => {
                    let (current, epoch) = self.store.snapshot();
                    if epoch != stale {
                        match current {
                            Some(token) => return Ok(token),
                            None if self.terminator.is_ended() => {
                                return Err(RefreshError::SessionEnded);
                            }
                            None => {}
                        }
                    }
                    let pending = self.spawn_refresh();
                    *slot = Some(pending.clone());
                    pending
                }
            }
        };
        pending.await
    }

    fn spawn_refresh(&self) -> SharedRefresh {
        let transport = self.transport.clone();
        let store = self.store.clone();
        let terminator = self.terminator.clone();
        let generation = store.generation();
        let slot = ReleaseSlot(self.in_flight.clone());

        let handle = tokio::spawn(async move {
            let _slot = slot;
            run_refresh(transport.as_ref(), &store, &terminator, generation).await
        });

        async move {
            handle
                .await
                .unwrap_or_else(|e| Err(RefreshError::Aborted(e.to_string())))
        }
        .boxed()
        .shared()
    }
}

/// Empties the in-flight slot when the refresh task ends, even by panic.
struct ReleaseSlot(Arc<Mutex<Option<SharedRefresh>>>);

impl Drop for ReleaseSlot {
    fn drop(&mut self) {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).take();
    }
}

async fn run_refresh(
    transport: &dyn HttpTransport,
    store: &CredentialStore,
    terminator: &SessionTerminator,
    generation: SessionGeneration,
) -> Result<AccessToken, RefreshError> {
    info!(backend = store.backend_name(), "refreshing access token");
    let outcome = request_new_token(transport, store).await;
    if store.generation() != generation {
        info!("session changed during refresh, discarding outcome");
        return Err(RefreshError::SessionEnded);
    }
    match outcome {
        Ok(token) => {
            if !store.apply_refreshed(generation, &token).await {
                info!("session changed during refresh, discarding token");
                return Err(RefreshError::SessionEnded);
            }
            info!("access token refreshed");
            Ok(token)
        }
        Err(e) => {
            warn!(error = %e, "token refresh failed, ending session");
            terminator.terminate().await;
            Err(e)
        }
    }
}

async fn request_new_token(
    transport: &dyn HttpTransport,
    store: &CredentialStore,
) -> Result<AccessToken, RefreshError> {
    let body = store.refresh_request().await?;
    let request = ApiRequest::post(REFRESH_PATH)
        .with_json(&body)
        .map_err(|e| RefreshError::Malformed(e.to_string()))?;

    let response = transport.send(request).await?;
    if !response.is_success() {
        return Err(RefreshError::Rejected {
            status: response.status,
            body: response.text(),
        });
    }
    let refreshed: RefreshResponse = response
        .decode()
        .map_err(|e| RefreshError::Malformed(e.to_string()))?;
    Ok(refreshed.access_token)
}
