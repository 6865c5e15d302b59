//! Session service.
//!
//! Owns the in-memory session user and the session-storage shim keys.
//! Mutation is merge-only (`update`); sign-out clears wholesale.

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use onboard_core::ports::KvStorePort;
use onboard_core::session::{SessionPatch, SessionUser};

/// Fake session identifier written on successful auth.
pub const SESSION_ID_KEY: &str = "session_id";
/// Username remembered by the sign-in form.
pub const REMEMBERED_USERNAME_KEY: &str = "remembered_username";
/// Username confirmed by the wizard.
pub const USERNAME_KEY: &str = "username";
/// Wizard completion flag.
pub const SETUP_COMPLETE_KEY: &str = "setup_complete";

pub struct SessionService {
    store: Arc<dyn KvStorePort>,
    user: Mutex<Option<SessionUser>>,
}

impl SessionService {
    pub fn new(store: Arc<dyn KvStorePort>) -> Self {
        Self {
            store,
            user: Mutex::new(None),
        }
    }

    /// Current session user, if signed in.
    pub async fn current(&self) -> Option<SessionUser> {
        self.user.lock().await.clone()
    }

    /// Replace the session user wholesale (sign-in).
    pub async fn replace(&self, user: SessionUser) {
        debug!(user_id = ?user.id, "session.replace");
        *self.user.lock().await = Some(user);
    }

    /// Shallow-merge a patch into the session user. Starts from an empty
    /// user when none is set yet.
    pub async fn update(&self, patch: SessionPatch) -> SessionUser {
        let mut guard = self.user.lock().await;
        let user = guard.get_or_insert_with(SessionUser::default);
        user.apply(patch);
        user.clone()
    }

    /// Drop the in-memory user and the stored session identifier. The
    /// remembered username deliberately survives sign-out.
    pub async fn clear(&self) -> Result<()> {
        debug!("session.clear");
        *self.user.lock().await = None;
        self.store.remove(SESSION_ID_KEY).await?;
        self.store.remove(USERNAME_KEY).await?;
        self.store.remove(SETUP_COMPLETE_KEY).await?;
        Ok(())
    }

    /// Mint and persist a fake session identifier.
    pub async fn open_session(&self) -> Result<String> {
        let session_id = Uuid::new_v4().to_string();
        self.store.set(SESSION_ID_KEY, &session_id).await?;
        Ok(session_id)
    }

    pub async fn session_id(&self) -> Result<Option<String>> {
        self.store.get(SESSION_ID_KEY).await
    }

    pub async fn remember_username(&self, username: &str) -> Result<()> {
        self.store.set(REMEMBERED_USERNAME_KEY, username).await
    }

    pub async fn remembered_username(&self) -> Result<Option<String>> {
        self.store.get(REMEMBERED_USERNAME_KEY).await
    }

    /// Persist the wizard-confirmed username.
    pub async fn adopt_username(&self, username: &str) -> Result<SessionUser> {
        self.store.set(USERNAME_KEY, username).await?;
        Ok(self.update(SessionPatch::username(username)).await)
    }

    pub async fn mark_setup_complete(&self) -> Result<()> {
        self.store.set(SETUP_COMPLETE_KEY, "true").await
    }

    pub async fn is_setup_complete(&self) -> Result<bool> {
        Ok(self.store.get(SETUP_COMPLETE_KEY).await?.as_deref() == Some("true"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct MemoryKv {
        entries: Mutex<HashMap<String, String>>,
    }

    impl MemoryKv {
        fn new() -> Self {
            Self {
                entries: Mutex::new(HashMap::new()),
            }
        }
    }

    #[async_trait::async_trait]
    impl KvStorePort for MemoryKv {
        async fn get(&self, key: &str) -> Result<Option<String>> {
            Ok(self.entries.lock().await.get(key).cloned())
        }

        async fn set(&self, key: &str, value: &str) -> Result<()> {
            self.entries
                .lock()
                .await
                .insert(key.to_string(), value.to_string());
            Ok(())
        }

        async fn remove(&self, key: &str) -> Result<()> {
            self.entries.lock().await.remove(key);
            Ok(())
        }
    }

    fn service() -> SessionService {
        SessionService::new(Arc::new(MemoryKv::new()))
    }

    #[tokio::test]
    async fn session_update_merges_into_empty_user() {
        let session = service();
        let user = session.update(SessionPatch::username("fresh_name")).await;
        assert_eq!(user.username.as_deref(), Some("fresh_name"));
        assert!(user.id.is_none());
    }

    #[tokio::test]
    async fn session_adopt_username_persists_and_merges() {
        let session = service();
        session
            .replace(SessionUser {
                id: Some("u-1".into()),
                ..Default::default()
            })
            .await;

        let user = session.adopt_username("picked_name").await.unwrap();
        assert_eq!(user.id.as_deref(), Some("u-1"));
        assert_eq!(user.username.as_deref(), Some("picked_name"));
        assert_eq!(
            session.store.get(USERNAME_KEY).await.unwrap().as_deref(),
            Some("picked_name")
        );
    }

    #[tokio::test]
    async fn session_clear_keeps_remembered_username() {
        let session = service();
        session.open_session().await.unwrap();
        session.remember_username("someone@example.com").await.unwrap();
        session.replace(SessionUser::default()).await;

        session.clear().await.unwrap();

        assert!(session.current().await.is_none());
        assert!(session.session_id().await.unwrap().is_none());
        assert_eq!(
            session.remembered_username().await.unwrap().as_deref(),
            Some("someone@example.com")
        );
    }

    #[tokio::test]
    async fn session_setup_complete_round_trip() {
        let session = service();
        assert!(!session.is_setup_complete().await.unwrap());
        session.mark_setup_complete().await.unwrap();
        assert!(session.is_setup_complete().await.unwrap());
    }
}
