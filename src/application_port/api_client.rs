use crate::domain_model::*;
use crate::domain_port::TransportError;
use serde::Serialize;
use serde::de::DeserializeOwned;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RefreshError {
    #[error("no refresh token available")]
    MissingRefreshToken,
    #[error("refresh rejected with status {status}")]
    Rejected { status: u16, body: String },
    #[error("refresh transport failure: {0}")]
    Transport(#[from] TransportError),
    #[error("malformed refresh response: {0}")]
    Malformed(String),
    #[error("session already ended")]
    SessionEnded,
    #[error("refresh task aborted: {0}")]
    Aborted(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The server refused the credential and no further refresh is allowed.
    #[error("unauthorized (status {status})")]
    Unauthorized { status: u16, body: String },
    #[error("token refresh failed: {0}")]
    Refresh(#[from] RefreshError),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("decode error: {0}")]
    Decode(String),
    #[error("request cancelled")]
    Cancelled,
}

impl ApiError {
    pub fn unauthorized(response: &ApiResponse) -> Self {
        ApiError::Unauthorized {
            status: response.status,
            body: response.text(),
        }
    }

    pub fn status(response: &ApiResponse) -> Self {
        ApiError::Status {
            status: response.status,
            body: response.text(),
        }
    }
}

#[async_trait::async_trait]
pub trait ApiClient: Send + Sync {
    /// Sends an authenticated request, refreshing the access token once on 401.
    ///
    /// Any non-401 response is returned as is, whatever its status.
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError>;
}

/// JSON conveniences over [`ApiClient::send`]. Non-2xx becomes [`ApiError::Status`].
#[async_trait::async_trait]
pub trait ApiClientExt: ApiClient {
    async fn get_json<T>(&self, path: &str) -> Result<T, ApiError>
    where
        T: DeserializeOwned + Send,
    {
        let response = self.send(ApiRequest::get(path)).await?;
        decode_success(&response)
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned + Send,
    {
        let request = ApiRequest::post(path)
            .with_json(body)
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        let response = self.send(request).await?;
        decode_success(&response)
    }
}

impl<C: ApiClient + ?Sized> ApiClientExt for C {}

fn decode_success<T: DeserializeOwned>(response: &ApiResponse) -> Result<T, ApiError> {
    if !response.is_success() {
        return Err(ApiError::status(response));
    }
    response
        .decode()
        .map_err(|e| ApiError::Decode(e.to_string()))
}
