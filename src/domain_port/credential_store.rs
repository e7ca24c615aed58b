pub const ACCESS_TOKEN_KEY: &str = "accessToken";
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

/// Durable key/value storage for tokens that must survive a restart.
///
/// Each call touches exactly one key and is atomic for that key.
#[async_trait::async_trait]
pub trait DurableCredentialStore: Send + Sync {
    async fn read(&self, key: &str) -> Result<Option<String>, CredentialStoreError>;
    async fn write(&self, key: &str, value: &str) -> Result<(), CredentialStoreError>;
    async fn remove(&self, key: &str) -> Result<(), CredentialStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum CredentialStoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("corrupt credential file: {0}")]
    Serde(#[from] serde_json::Error),
}
