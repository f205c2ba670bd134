use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

use super::storage::{MemoryStorage, SessionStorage};
use crate::api::types::{AuthLoginReturn, UserData};

/// Token and user of the signed-in account. An empty token means signed out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: Option<UserData>,
    /// Informational only; authentication is decided by the token alone.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        !self.token.is_empty()
    }
}

/// Shared handle to the session. Cloning shares the same state.
///
/// Every write goes through a single write-lock and is then written through
/// to the storage backend. Writes are serialised by `persist` so storage sees
/// them in the same order as memory; readers only wait for the in-memory swap.
#[derive(Clone)]
pub struct SessionState {
    inner: Arc<RwLock<Session>>,
    persist: Arc<Mutex<()>>,
    storage: Arc<dyn SessionStorage>,
}

impl SessionState {
    /// Restores the session from `storage`, starting empty when nothing
    /// usable is stored.
    pub fn restore(storage: Arc<dyn SessionStorage>) -> Self {
        let session = match storage.load() {
            Ok(Some(session)) => {
                info!("Restored session (authenticated: {})", session.is_authenticated());
                session
            }
            Ok(None) => Session::default(),
            Err(e) => {
                warn!("Discarding unreadable stored session: {}", e);
                Session::default()
            }
        };

        Self {
            inner: Arc::new(RwLock::new(session)),
            persist: Arc::new(Mutex::new(())),
            storage,
        }
    }

    pub fn in_memory() -> Self {
        Self::restore(Arc::new(MemoryStorage::default()))
    }

    pub async fn token(&self) -> String {
        self.inner.read().await.token.clone()
    }

    pub async fn user(&self) -> Option<UserData> {
        self.inner.read().await.user.clone()
    }

    pub async fn snapshot(&self) -> Session {
        self.inner.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.inner.read().await.is_authenticated()
    }

    /// Stores the token and user returned by a successful login.
    pub(crate) async fn sign_in(&self, login: &AuthLoginReturn) {
        let session = Session {
            token: login.token.clone(),
            user: Some(login.user_data.clone()),
            expires_at: login.expires_in.and_then(expiry_from_now),
        };
        self.replace(session).await;
    }

    pub async fn clear_user(&self) {
        self.replace(Session::default()).await;
    }

    async fn replace(&self, session: Session) {
        let _persist = self.persist.lock().await;
        *self.inner.write().await = session.clone();

        let storage = self.storage.clone();
        match tokio::task::spawn_blocking(move || storage.save(&session)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!("Failed to persist session: {}", e),
            Err(e) => warn!("Session persistence task failed: {}", e),
        }
    }
}

/// `now + secs`, or `None` when the server sent a lifetime chrono cannot
/// represent.
fn expiry_from_now(secs: i64) -> Option<DateTime<Utc>> {
    let expiry = Duration::try_seconds(secs).and_then(|d| Utc::now().checked_add_signed(d));
    if expiry.is_none() {
        warn!("Ignoring out-of-range token lifetime of {} seconds", secs);
    }
    expiry
}
