use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use tokio::sync::watch;

use crate::auth::storage::TokenStore;
use crate::error::AuthError;

/// Consistent view of the auth state at one point in time
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuthSnapshot {
    pub token: Option<String>,
    pub is_authenticated: bool,
}

impl AuthSnapshot {
    fn from_token(token: Option<String>) -> Self {
        let is_authenticated = token.is_some();
        Self { token, is_authenticated }
    }
}

/// Callback invoked after every auth change, with the new snapshot
pub trait AuthObserver: Send + Sync {
    fn on_auth_change(&self, snapshot: &AuthSnapshot);
}

/// Single-writer auth cell mirroring the persisted admin token.
///
/// The persisted and in-memory values only diverge while a write is in
/// progress; subscribers are notified after both have been updated.
pub struct AuthState {
    store: TokenStore,
    current: RwLock<AuthSnapshot>,
    writer: Mutex<()>,
    sender: watch::Sender<AuthSnapshot>,
    observers: RwLock<Vec<Arc<dyn AuthObserver>>>,
}

impl AuthState {
    /// Read the persisted token before handing out the state, so the first
    /// consumer already sees the final authentication status.
    pub fn load(store: TokenStore) -> Result<Self, AuthError> {
        let snapshot = AuthSnapshot::from_token(store.load()?);
        let (sender, _) = watch::channel(snapshot.clone());

        tracing::debug!(authenticated = snapshot.is_authenticated, "auth state loaded");

        Ok(Self {
            store,
            current: RwLock::new(snapshot),
            writer: Mutex::new(()),
            sender,
            observers: RwLock::new(Vec::new()),
        })
    }

    pub fn token(&self) -> Option<String> {
        self.current.read().token.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.read().is_authenticated
    }

    pub fn snapshot(&self) -> AuthSnapshot {
        self.current.read().clone()
    }

    /// Persist a new token and publish it. Surrounding whitespace is dropped.
    pub fn set_token(&self, token: &str) -> Result<(), AuthError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AuthError::EmptyToken);
        }

        let snapshot = {
            let _writer = self.writer.lock();
            self.store.save(token)?;
            self.commit(AuthSnapshot::from_token(Some(token.to_string())))
        };

        tracing::info!("admin token updated");
        self.notify(&snapshot);
        Ok(())
    }

    pub fn clear_token(&self) -> Result<(), AuthError> {
        let snapshot = {
            let _writer = self.writer.lock();
            self.store.clear()?;
            self.commit(AuthSnapshot::default())
        };

        tracing::info!("admin token cleared");
        self.notify(&snapshot);
        Ok(())
    }

    pub fn logout(&self) -> Result<(), AuthError> {
        self.clear_token()
    }

    /// Receiver that always holds the latest published snapshot
    pub fn subscribe(&self) -> watch::Receiver<AuthSnapshot> {
        self.sender.subscribe()
    }

    pub fn observe(&self, observer: Arc<dyn AuthObserver>) {
        self.observers.write().push(observer);
    }

    /// Update memory and the watch channel. Must run under the writer lock
    /// so subscribers see writes in persisted order.
    fn commit(&self, snapshot: AuthSnapshot) -> AuthSnapshot {
        *self.current.write() = snapshot.clone();
        self.sender.send_replace(snapshot.clone());
        snapshot
    }

    /// Run observer callbacks with no lock held; they may write to the
    /// state or register further observers.
    fn notify(&self, snapshot: &AuthSnapshot) {
        let observers = self.observers.read().clone();
        for observer in observers {
            observer.on_auth_change(snapshot);
        }
    }
}
