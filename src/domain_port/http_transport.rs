use crate::domain_model::{ApiRequest, ApiResponse};

/// Sends one request and returns whatever the server answered.
///
/// Non-2xx statuses are a successful transport outcome; only failures to get
/// any response at all are errors.
#[async_trait::async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("transport error: {0}")]
    Other(String),
}
