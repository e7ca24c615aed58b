use crate::domain_port::*;
use std::collections::HashMap;
use std::sync::Mutex;

/// In-process stand-in for device storage.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    entries: Mutex<HashMap<String, String>>,
    failing: bool,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every operation fails with an io error.
    pub fn failing() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            failing: true,
        }
    }

    pub fn with_entry(self, key: &str, value: &str) -> Self {
        self.lock().insert(key.to_owned(), value.to_owned());
        self
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn check(&self) -> Result<(), CredentialStoreError> {
        if self.failing {
            return Err(CredentialStoreError::Io(std::io::Error::other(
                "simulated storage failure",
            )));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl DurableCredentialStore for MemoryCredentialStore {
    async fn read(&self, key: &str) -> Result<Option<String>, CredentialStoreError> {
        self.check()?;
        Ok(self.get(key))
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), CredentialStoreError> {
        self.check()?;
        self.lock().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), CredentialStoreError> {
        self.check()?;
        self.lock().remove(key);
        Ok(())
    }
}
