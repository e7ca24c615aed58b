use super::CredentialStore;
use crate::domain_model::*;
use std::sync::Arc;

/// Stamps outgoing requests with the current bearer token.
#[derive(Clone)]
pub struct RequestAuthenticator {
    store: Arc<CredentialStore>,
}

impl RequestAuthenticator {
    pub fn new(store: Arc<CredentialStore>) -> Self {
        Self { store }
    }

    /// Returns the request ready to send and the token epoch it was stamped with.
    pub fn authenticate(&self, mut request: ApiRequest) -> (ApiRequest, TokenEpoch) {
        let (token, epoch) = self.store.snapshot();
        match token {
            Some(token) => request.set_header(AUTHORIZATION, token.bearer()),
            None => request.remove_header(AUTHORIZATION),
        }
        (request, epoch)
    }
}
