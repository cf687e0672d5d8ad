//! Session store: the authentication state machine.
//!
//! Owns the authenticated identity and publishes it through a
//! `tokio::sync::watch` channel so the presentation layer can re-render on
//! change. Identity and the authenticated flag are one value (`AuthState`),
//! so they can never be observed out of step.

use std::sync::Arc;

use secrecy::SecretString;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use banter_types::error::AuthError;
use banter_types::identity::Identity;

use crate::backend::{AccountApi, CURRENT_SESSION};

/// Authentication state. Carrying the identity inside the `Authenticated`
/// variant makes "authenticated iff identity is resolved" structural.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthState {
    #[default]
    Unauthenticated,
    Authenticated(Identity),
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated(_))
    }

    pub fn identity(&self) -> Option<&Identity> {
        match self {
            AuthState::Authenticated(identity) => Some(identity),
            AuthState::Unauthenticated => None,
        }
    }
}

/// State machine over an injected [`AccountApi`] client.
///
/// Every operation runs to completion before returning and applies its
/// state change as a single `watch` update; readers never observe a
/// partial transition.
pub struct SessionStore<A: AccountApi> {
    account: Arc<A>,
    state: watch::Sender<AuthState>,
}

impl<A: AccountApi> SessionStore<A> {
    /// Create a store in the initial `Unauthenticated` state.
    pub fn new(account: Arc<A>) -> Self {
        let (state, _) = watch::channel(AuthState::default());
        Self { account, state }
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    /// The current identity, if authenticated.
    pub fn identity(&self) -> Option<Identity> {
        self.state.borrow().identity().cloned()
    }

    /// Check the backend for an existing session on startup.
    ///
    /// Never fails: a missing, expired, or unreachable session normalizes
    /// to `Unauthenticated`.
    pub async fn check_existing_session(&self) {
        debug!("checking for existing session");
        match self.account.get_session(CURRENT_SESSION).await {
            Ok(session) if !session.id.is_empty() => {
                if self.refresh_identity().await.is_some() {
                    info!("active session found");
                }
            }
            Ok(_) => {
                debug!("no active session");
                self.state.send_replace(AuthState::Unauthenticated);
            }
            Err(err) => {
                debug!(error = %err, "no active session");
                self.state.send_replace(AuthState::Unauthenticated);
            }
        }
    }

    /// Create an account, open a session for it, and authenticate.
    ///
    /// The identity comes from the created account record; no extra fetch.
    /// On failure the error propagates and local state is left unchanged.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &SecretString,
    ) -> Result<Identity, AuthError> {
        debug!(email, "starting registration");
        let identity = self.account.create_account(name, email, password).await?;
        let session = self.account.create_email_session(email, password).await?;
        debug!(session_id = %session.id, "session created for new account");

        self.state
            .send_replace(AuthState::Authenticated(identity.clone()));
        info!(email, "registration completed");
        Ok(identity)
    }

    /// Open an email/password session and resolve the identity behind it.
    ///
    /// A session that is created but whose identity cannot be resolved is a
    /// failure ([`AuthError::IdentityUnresolved`]): local state must never
    /// claim authenticated without a resolved identity, even though a
    /// remote session may exist. Any failure forces `Unauthenticated`.
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<Identity, AuthError> {
        debug!(email, "starting login");
        let session = match self.account.create_email_session(email, password).await {
            Ok(session) => session,
            Err(err) => {
                self.state.send_replace(AuthState::Unauthenticated);
                return Err(err.into());
            }
        };
        debug!(session_id = %session.id, "session created");

        match self.refresh_identity().await {
            Some(identity) => {
                info!(email, "login completed");
                Ok(identity)
            }
            None => {
                warn!(email, "session created but identity fetch failed");
                Err(AuthError::IdentityUnresolved)
            }
        }
    }

    /// Delete the current session and clear the identity.
    ///
    /// If the delete call fails the error propagates and local state is
    /// left unchanged; the caller decides whether to retry.
    pub async fn logout(&self) -> Result<(), AuthError> {
        debug!("logging out");
        self.account.delete_session(CURRENT_SESSION).await?;
        self.state.send_replace(AuthState::Unauthenticated);
        info!("logout completed");
        Ok(())
    }

    /// Fetch the identity for the current session and set state from the
    /// result. Idempotent; touches nothing but the published state.
    async fn refresh_identity(&self) -> Option<Identity> {
        match self.account.get_account().await {
            Ok(identity) => {
                self.state
                    .send_replace(AuthState::Authenticated(identity.clone()));
                Some(identity)
            }
            Err(err) => {
                debug!(error = %err, "failed to fetch current identity");
                self.state.send_replace(AuthState::Unauthenticated);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::Future;
    use std::sync::Mutex;

    use banter_types::error::BackendError;

    use crate::backend::SessionRecord;

    // --- Mock account API ---

    struct MockAccount {
        session: Result<SessionRecord, BackendError>,
        created_account: Result<Identity, BackendError>,
        created_session: Result<SessionRecord, BackendError>,
        deleted_session: Result<(), BackendError>,
        account: Result<Identity, BackendError>,
        calls: Mutex<Vec<&'static str>>,
    }

    fn alice() -> Identity {
        Identity::new("usr_alice", "Alice", "alice@x.com")
    }

    fn network_error() -> BackendError {
        BackendError::Network("connection refused".to_string())
    }

    impl MockAccount {
        fn ok() -> Self {
            Self {
                session: Ok(SessionRecord {
                    id: "sess_1".to_string(),
                }),
                created_account: Ok(alice()),
                created_session: Ok(SessionRecord {
                    id: "sess_1".to_string(),
                }),
                deleted_session: Ok(()),
                account: Ok(alice()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn record(&self, call: &'static str) {
            self.calls.lock().unwrap().push(call);
        }

        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl AccountApi for MockAccount {
        fn get_session(
            &self,
            _session_id: &str,
        ) -> impl Future<Output = Result<SessionRecord, BackendError>> + Send {
            self.record("get_session");
            let result = self.session.clone();
            async move { result }
        }

        fn create_account(
            &self,
            _name: &str,
            _email: &str,
            _password: &SecretString,
        ) -> impl Future<Output = Result<Identity, BackendError>> + Send {
            self.record("create_account");
            let result = self.created_account.clone();
            async move { result }
        }

        fn create_email_session(
            &self,
            _email: &str,
            _password: &SecretString,
        ) -> impl Future<Output = Result<SessionRecord, BackendError>> + Send {
            self.record("create_email_session");
            let result = self.created_session.clone();
            async move { result }
        }

        fn delete_session(
            &self,
            _session_id: &str,
        ) -> impl Future<Output = Result<(), BackendError>> + Send {
            self.record("delete_session");
            let result = self.deleted_session.clone();
            async move { result }
        }

        fn get_account(&self) -> impl Future<Output = Result<Identity, BackendError>> + Send {
            self.record("get_account");
            let result = self.account.clone();
            async move { result }
        }
    }

    fn store(mock: MockAccount) -> (SessionStore<MockAccount>, Arc<MockAccount>) {
        let account = Arc::new(mock);
        (SessionStore::new(account.clone()), account)
    }

    fn password() -> SecretString {
        SecretString::from("pw123")
    }

    // --- Startup session check ---

    #[tokio::test]
    async fn check_existing_session_authenticates_when_session_is_live() {
        let (store, _) = store(MockAccount::ok());
        store.check_existing_session().await;
        assert_eq!(store.state(), AuthState::Authenticated(alice()));
    }

    #[tokio::test]
    async fn check_existing_session_swallows_backend_errors() {
        let mut mock = MockAccount::ok();
        mock.session = Err(BackendError::Unauthorized);
        let (store, account) = store(mock);

        store.check_existing_session().await;

        assert_eq!(store.state(), AuthState::Unauthenticated);
        // Identity fetch is skipped entirely when the session check fails.
        assert_eq!(account.calls(), vec!["get_session"]);
    }

    #[tokio::test]
    async fn check_existing_session_treats_empty_session_id_as_absent() {
        let mut mock = MockAccount::ok();
        mock.session = Ok(SessionRecord { id: String::new() });
        let (store, account) = store(mock);

        store.check_existing_session().await;

        assert_eq!(store.state(), AuthState::Unauthenticated);
        assert_eq!(account.calls(), vec!["get_session"]);
    }

    #[tokio::test]
    async fn check_existing_session_normalizes_identity_failure() {
        let mut mock = MockAccount::ok();
        mock.account = Err(network_error());
        let (store, _) = store(mock);

        // Must not error even though the identity fetch failed.
        store.check_existing_session().await;
        assert_eq!(store.state(), AuthState::Unauthenticated);
    }

    // --- Registration ---

    #[tokio::test]
    async fn register_creates_account_then_session() {
        let (store, account) = store(MockAccount::ok());

        let identity = store
            .register("Alice", "alice@x.com", &password())
            .await
            .unwrap();

        assert_eq!(identity, alice());
        assert_eq!(store.state(), AuthState::Authenticated(alice()));
        assert_eq!(account.calls(), vec!["create_account", "create_email_session"]);
    }

    #[tokio::test]
    async fn register_failure_propagates_and_leaves_state_unchanged() {
        let mut mock = MockAccount::ok();
        mock.created_account = Err(BackendError::Service {
            status: 409,
            message: "user already exists".to_string(),
        });
        let (store, account) = store(mock);

        let err = store
            .register("Alice", "alice@x.com", &password())
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::Backend(_)));
        assert_eq!(store.state(), AuthState::Unauthenticated);
        assert_eq!(account.calls(), vec!["create_account"]);
    }

    // --- Login ---

    #[tokio::test]
    async fn login_resolves_identity_after_session_creation() {
        let (store, account) = store(MockAccount::ok());

        let identity = store.login("alice@x.com", &password()).await.unwrap();

        assert_eq!(identity, alice());
        assert_eq!(store.state(), AuthState::Authenticated(alice()));
        assert_eq!(account.calls(), vec!["create_email_session", "get_account"]);
    }

    #[tokio::test]
    async fn login_with_bad_credentials_forces_unauthenticated() {
        let mut mock = MockAccount::ok();
        mock.created_session = Err(BackendError::Unauthorized);
        let (store, _) = store(mock);

        let err = store.login("alice@x.com", &password()).await.unwrap_err();

        assert!(matches!(err, AuthError::Backend(BackendError::Unauthorized)));
        assert_eq!(store.state(), AuthState::Unauthenticated);
    }

    #[tokio::test]
    async fn login_without_resolvable_identity_is_a_failure() {
        let mut mock = MockAccount::ok();
        mock.account = Err(network_error());
        let (store, _) = store(mock);

        let err = store.login("alice@x.com", &password()).await.unwrap_err();

        // Session creation succeeded remotely, but the store must not claim
        // authenticated without an identity.
        assert!(matches!(err, AuthError::IdentityUnresolved));
        assert_eq!(store.state(), AuthState::Unauthenticated);
    }

    // --- Logout ---

    #[tokio::test]
    async fn logout_clears_identity() {
        let (store, _) = store(MockAccount::ok());
        store.login("alice@x.com", &password()).await.unwrap();

        store.logout().await.unwrap();

        assert_eq!(store.state(), AuthState::Unauthenticated);
        assert!(store.identity().is_none());
    }

    #[tokio::test]
    async fn logout_is_fine_when_already_unauthenticated() {
        let (store, _) = store(MockAccount::ok());
        store.logout().await.unwrap();
        assert_eq!(store.state(), AuthState::Unauthenticated);
    }

    #[tokio::test]
    async fn failed_logout_propagates_and_keeps_local_state() {
        let mut mock = MockAccount::ok();
        mock.deleted_session = Err(network_error());
        let (store, _) = store(mock);
        store.login("alice@x.com", &password()).await.unwrap();

        let err = store.logout().await.unwrap_err();

        assert!(matches!(err, AuthError::Backend(_)));
        // Caller decides whether to retry; identity is still held.
        assert_eq!(store.state(), AuthState::Authenticated(alice()));
    }

    // --- State consistency ---

    #[tokio::test]
    async fn identity_and_flag_always_change_together() {
        let (store, _) = store(MockAccount::ok());
        let mut rx = store.subscribe();

        store.login("alice@x.com", &password()).await.unwrap();
        store.logout().await.unwrap();

        // Every observable state has the flag and identity in agreement,
        // which the AuthState enum guarantees by construction.
        loop {
            let state = rx.borrow_and_update().clone();
            assert_eq!(state.is_authenticated(), state.identity().is_some());
            if rx.has_changed().map(|changed| !changed).unwrap_or(true) {
                break;
            }
        }
        assert_eq!(store.state(), AuthState::Unauthenticated);
    }
}
