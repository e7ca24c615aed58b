use super::CredentialStore;
use crate::domain_port::Navigator;
use crate::logger::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

pub const SESSION_EXPIRED_NOTICE: &str = "Your session has expired. Please log in again.";

/// Ends a session that can no longer be refreshed.
///
/// Starts ended: a client that never logged in has no session to expire.
/// Only the first call after a login or restore has any effect; later calls
/// are no-ops until [`SessionTerminator::rearm`].
pub struct SessionTerminator {
    store: Arc<CredentialStore>,
    navigator: Arc<dyn Navigator>,
    login_route: String,
    ended: AtomicBool,
}

impl SessionTerminator {
    pub fn new(
        store: Arc<CredentialStore>,
        navigator: Arc<dyn Navigator>,
        login_route: impl Into<String>,
    ) -> Self {
        Self {
            store,
            navigator,
            login_route: login_route.into(),
            ended: AtomicBool::new(true),
        }
    }

    /// Returns true if this call performed the termination.
    pub async fn terminate(&self) -> bool {
        if self.ended.swap(true, Ordering::AcqRel) {
            debug!("session already terminated");
            return false;
        }
        self.store.clear().await;
        info!(route = %self.login_route, "session expired, redirecting to login");
        self.navigator.notify(SESSION_EXPIRED_NOTICE);
        self.navigator.redirect(&self.login_route);
        true
    }

    /// Marks the session as ended without user-visible side effects.
    pub fn mark_ended(&self) {
        self.ended.store(true, Ordering::Release);
    }

    pub fn rearm(&self) {
        self.ended.store(false, Ordering::Release);
    }

    pub fn is_ended(&self) -> bool {
        self.ended.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application_impl::ExplicitTokenBackend;
    use crate::domain_model::*;
    use crate::infra_memory::{MemoryCredentialStore, RecordingNavigator};

    struct Fixture {
        store: Arc<CredentialStore>,
        durable: Arc<MemoryCredentialStore>,
        navigator: Arc<RecordingNavigator>,
        terminator: SessionTerminator,
    }

    async fn fixture() -> Fixture {
        let durable = Arc::new(MemoryCredentialStore::new());
        let store = Arc::new(CredentialStore::new(Arc::new(ExplicitTokenBackend::new(
            durable.clone(),
        ))));
        store
            .begin_session(&Session::new("tok".into(), Some("ref".into())))
            .await;
        let navigator = Arc::new(RecordingNavigator::new());
        let terminator = SessionTerminator::new(store.clone(), navigator.clone(), "/login");
        terminator.rearm();
        Fixture {
            store,
            durable,
            navigator,
            terminator,
        }
    }

    #[tokio::test]
    async fn clears_credentials_then_notifies_and_redirects() {
        let f = fixture().await;

        assert!(f.terminator.terminate().await);
        assert_eq!(f.store.access_token(), None);
        assert!(f.durable.is_empty());
        assert_eq!(f.navigator.notices(), vec![SESSION_EXPIRED_NOTICE.to_owned()]);
        assert_eq!(f.navigator.routes(), vec!["/login".to_owned()]);
    }

    #[tokio::test]
    async fn second_terminate_has_no_effect() {
        let f = fixture().await;

        assert!(f.terminator.terminate().await);
        assert!(!f.terminator.terminate().await);

        assert!(f.terminator.is_ended());
        assert_eq!(f.store.access_token(), None);
        assert_eq!(f.navigator.notices().len(), 1);
        assert_eq!(f.navigator.routes().len(), 1);
    }

    #[tokio::test]
    async fn rearm_allows_next_session_to_expire() {
        let f = fixture().await;
        f.terminator.terminate().await;

        f.terminator.rearm();
        assert!(f.terminator.terminate().await);
        assert_eq!(f.navigator.routes().len(), 2);
    }

    #[tokio::test]
    async fn unarmed_terminator_is_silent() {
        let store = Arc::new(CredentialStore::new(Arc::new(ExplicitTokenBackend::new(
            Arc::new(MemoryCredentialStore::new()),
        ))));
        let navigator = Arc::new(RecordingNavigator::new());
        let terminator = SessionTerminator::new(store, navigator.clone(), "/login");

        assert!(terminator.is_ended());
        assert!(!terminator.terminate().await);
        assert!(navigator.notices().is_empty());
        assert!(navigator.routes().is_empty());
    }

    #[tokio::test]
    async fn mark_ended_is_silent() {
        let f = fixture().await;
        f.terminator.mark_ended();

        assert!(!f.terminator.terminate().await);
        assert!(f.navigator.notices().is_empty());
    }
}
