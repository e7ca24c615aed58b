use crate::application_port::*;
use crate::domain_model::*;
use crate::logger::*;
use std::sync::{Arc, PoisonError, RwLock, RwLockWriteGuard};
use tokio::sync::Mutex;

struct Live {
    token: Option<AccessToken>,
    epoch: u64,
    generation: u64,
}

/// Owner of the live access token.
///
/// The in-memory value is authoritative for outgoing requests; durable state
/// is delegated to the [`CredentialBackend`] and always written after memory.
/// Durable writes are serialized so a clear can never be overtaken by a
/// persist that started before it.
pub struct CredentialStore {
    live: RwLock<Live>,
    durable: Mutex<()>,
    backend: Arc<dyn CredentialBackend>,
}

impl CredentialStore {
    pub fn new(backend: Arc<dyn CredentialBackend>) -> Self {
        Self {
            live: RwLock::new(Live {
                token: None,
                epoch: 0,
                generation: 0,
            }),
            durable: Mutex::new(()),
            backend,
        }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    pub fn access_token(&self) -> Option<AccessToken> {
        self.snapshot().0
    }

    pub fn epoch(&self) -> TokenEpoch {
        self.snapshot().1
    }

    pub fn generation(&self) -> SessionGeneration {
        let live = self.live.read().unwrap_or_else(PoisonError::into_inner);
        SessionGeneration(live.generation)
    }

    /// Token and epoch read under one lock so they always belong together.
    pub fn snapshot(&self) -> (Option<AccessToken>, TokenEpoch) {
        let live = self.live.read().unwrap_or_else(PoisonError::into_inner);
        (live.token.clone(), TokenEpoch(live.epoch))
    }

    pub fn set_access_token(&self, token: Option<AccessToken>) {
        let mut live = self.write_live();
        live.token = token;
        live.epoch += 1;
    }

    pub async fn persist(&self, token: &AccessToken) {
        let _durable = self.durable.lock().await;
        self.backend.persist_access_token(token).await;
    }

    /// Installs a refreshed token, unless the session it was refreshed for
    /// has since been cleared or replaced. Returns whether it was applied.
    pub async fn apply_refreshed(
        &self,
        generation: SessionGeneration,
        token: &AccessToken,
    ) -> bool {
        let _durable = self.durable.lock().await;
        {
            let mut live = self.write_live();
            if live.generation != generation.0 {
                return false;
            }
            live.token = Some(token.clone());
            live.epoch += 1;
        }
        self.backend.persist_access_token(token).await;
        true
    }

    pub async fn clear(&self) {
        self.start_generation(None);
        let _durable = self.durable.lock().await;
        self.backend.clear().await;
    }

    pub async fn begin_session(&self, session: &Session) {
        let _durable = self.durable.lock().await;
        self.start_generation(session.access_token.clone());
        self.backend.persist_session(session).await;
    }

    /// Loads a persisted session into memory. Returns whether one was found.
    pub async fn restore(&self) -> bool {
        match self.backend.load_session().await {
            Some(session) if session.is_authenticated() => {
                debug!(backend = self.backend.name(), "restored persisted session");
                self.start_generation(session.access_token);
                true
            }
            _ => false,
        }
    }

    pub async fn refresh_request(&self) -> Result<RefreshRequest, RefreshError> {
        self.backend.refresh_request().await
    }

    fn start_generation(&self, token: Option<AccessToken>) {
        let mut live = self.write_live();
        live.token = token;
        live.epoch += 1;
        live.generation += 1;
    }

    fn write_live(&self) -> RwLockWriteGuard<'_, Live> {
        self.live.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application_impl::ExplicitTokenBackend;
    use crate::domain_port::*;
    use crate::infra_memory::MemoryCredentialStore;

    fn store_with(durable: Arc<MemoryCredentialStore>) -> CredentialStore {
        CredentialStore::new(Arc::new(ExplicitTokenBackend::new(durable)))
    }

    #[test]
    fn set_access_token_is_visible_immediately() {
        let store = store_with(Arc::new(MemoryCredentialStore::new()));
        let before = store.epoch();

        store.set_access_token(Some(AccessToken::from("tok1")));
        assert_eq!(store.access_token(), Some(AccessToken::from("tok1")));
        assert!(store.epoch() > before);

        store.set_access_token(None);
        assert_eq!(store.access_token(), None);
    }

    #[tokio::test]
    async fn persist_follows_memory_update() {
        let durable = Arc::new(MemoryCredentialStore::new());
        let store = store_with(durable.clone());

        let token = AccessToken::from("tok2");
        store.set_access_token(Some(token.clone()));
        store.persist(&token).await;

        assert_eq!(durable.get(ACCESS_TOKEN_KEY).as_deref(), Some("tok2"));
    }

    #[tokio::test]
    async fn clear_wipes_memory_and_durable_state() {
        let durable = Arc::new(MemoryCredentialStore::new());
        let store = store_with(durable.clone());
        store
            .begin_session(&Session::new("a".into(), Some("r".into())))
            .await;
        assert!(!durable.is_empty());

        store.clear().await;
        assert_eq!(store.access_token(), None);
        assert!(durable.is_empty());
    }

    #[tokio::test]
    async fn storage_failures_are_not_surfaced() {
        let store = store_with(Arc::new(MemoryCredentialStore::failing()));
        let token = AccessToken::from("tok");

        store.set_access_token(Some(token.clone()));
        store.persist(&token).await;
        assert_eq!(store.access_token(), Some(token));

        store.clear().await;
        assert_eq!(store.access_token(), None);
    }

    #[tokio::test]
    async fn refreshed_token_is_dropped_after_clear() {
        let durable = Arc::new(MemoryCredentialStore::new());
        let store = store_with(durable.clone());
        store
            .begin_session(&Session::new("tok1".into(), Some("ref1".into())))
            .await;
        let generation = store.generation();

        store.clear().await;
        let applied = store
            .apply_refreshed(generation, &AccessToken::from("tok2"))
            .await;

        assert!(!applied);
        assert_eq!(store.access_token(), None);
        assert_eq!(durable.get(ACCESS_TOKEN_KEY), None);
    }

    #[tokio::test]
    async fn refreshed_token_is_dropped_after_new_login() {
        let store = store_with(Arc::new(MemoryCredentialStore::new()));
        store
            .begin_session(&Session::new("old".into(), Some("r".into())))
            .await;
        let generation = store.generation();

        store
            .begin_session(&Session::new("new".into(), Some("r2".into())))
            .await;
        assert!(
            !store
                .apply_refreshed(generation, &AccessToken::from("stale"))
                .await
        );
        assert_eq!(store.access_token(), Some(AccessToken::from("new")));
    }

    #[tokio::test]
    async fn refreshed_token_applies_within_same_session() {
        let durable = Arc::new(MemoryCredentialStore::new());
        let store = store_with(durable.clone());
        store
            .begin_session(&Session::new("tok1".into(), Some("ref1".into())))
            .await;
        let before = store.epoch();

        assert!(
            store
                .apply_refreshed(store.generation(), &AccessToken::from("tok2"))
                .await
        );
        assert_eq!(store.access_token(), Some(AccessToken::from("tok2")));
        assert!(store.epoch() > before);
        assert_eq!(durable.get(ACCESS_TOKEN_KEY).as_deref(), Some("tok2"));
    }

    #[tokio::test]
    async fn restore_loads_persisted_session() {
        let durable = Arc::new(
            MemoryCredentialStore::new()
                .with_entry(ACCESS_TOKEN_KEY, "saved")
                .with_entry(REFRESH_TOKEN_KEY, "r"),
        );
        let store = store_with(durable);

        assert!(store.restore().await);
        assert_eq!(store.access_token(), Some(AccessToken::from("saved")));
    }

    #[tokio::test]
    async fn restore_without_saved_token_finds_nothing() {
        let store = store_with(Arc::new(MemoryCredentialStore::new()));
        assert!(!store.restore().await);
        assert_eq!(store.access_token(), None);
    }
}
