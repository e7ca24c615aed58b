use crate::domain_port::*;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

#[cfg(unix)]
const OWNER_ONLY: u32 = 0o600;

/// Tokens kept in a small JSON object on disk.
///
/// Every write replaces the whole file through a temp file and a rename, so
/// readers see either the old or the new value for a key. On unix the file is
/// readable by its owner only.
pub struct FileCredentialStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<BTreeMap<String, String>, CredentialStoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(BTreeMap::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, entries: &BTreeMap<String, String>) -> Result<(), CredentialStoreError> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                tokio::fs::create_dir_all(dir).await?;
            }
        }
        let tmp = self.path.with_extension("tmp");
        let mut options = tokio::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(OWNER_ONLY);
        let mut file = options.open(&tmp).await?;
        // A temp file left over from an earlier crash keeps its old mode.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(std::fs::Permissions::from_mode(OWNER_ONLY))
                .await?;
        }
        file.write_all(&serde_json::to_vec_pretty(entries)?).await?;
        file.sync_all().await?;
        drop(file);
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl DurableCredentialStore for FileCredentialStore {
    async fn read(&self, key: &str) -> Result<Option<String>, CredentialStoreError> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.remove(key))
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), CredentialStoreError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load().await?;
        entries.insert(key.to_owned(), value.to_owned());
        self.save(&entries).await
    }

    async fn remove(&self, key: &str) -> Result<(), CredentialStoreError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load().await?;
        if entries.remove(key).is_some() {
            self.save(&entries).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn values_survive_a_new_instance() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("credentials.json");

        FileCredentialStore::new(&path)
            .write(ACCESS_TOKEN_KEY, "tok1")
            .await
            .unwrap();

        let reopened = FileCredentialStore::new(&path);
        assert_eq!(
            reopened.read(ACCESS_TOKEN_KEY).await.unwrap().as_deref(),
            Some("tok1")
        );
        assert_eq!(reopened.read(REFRESH_TOKEN_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn remove_touches_only_its_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("credentials.json"));
        store.write(ACCESS_TOKEN_KEY, "a").await.unwrap();
        store.write(REFRESH_TOKEN_KEY, "r").await.unwrap();

        store.remove(ACCESS_TOKEN_KEY).await.unwrap();

        assert_eq!(store.read(ACCESS_TOKEN_KEY).await.unwrap(), None);
        assert_eq!(
            store.read(REFRESH_TOKEN_KEY).await.unwrap().as_deref(),
            Some("r")
        );
        assert!(!dir.path().join("credentials.tmp").exists());
    }

    #[tokio::test]
    async fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("absent.json"));
        assert_eq!(store.read(ACCESS_TOKEN_KEY).await.unwrap(), None);
        store.remove(ACCESS_TOKEN_KEY).await.unwrap();
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        std::fs::write(&path, b"not json").unwrap();

        let err = FileCredentialStore::new(&path)
            .read(ACCESS_TOKEN_KEY)
            .await
            .unwrap_err();
        assert!(matches!(err, CredentialStoreError::Serde(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn credential_file_is_private_to_owner() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        std::fs::write(path.with_extension("tmp"), b"{}").unwrap();
        std::fs::set_permissions(
            path.with_extension("tmp"),
            std::fs::Permissions::from_mode(0o644),
        )
        .unwrap();

        let store = FileCredentialStore::new(&path);
        store.write(REFRESH_TOKEN_KEY, "ref1").await.unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
