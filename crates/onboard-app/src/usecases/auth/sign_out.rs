//! Sign-out use case.
//!
//! Clears the session wholesale, empties the popup stack and fires the
//! avatar-cache clear. Cache errors are unobserved: it is a cache.

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use onboard_core::ports::AvatarCachePort;

use crate::popup::PopupService;
use crate::session::SessionService;

pub struct SignOut {
    session: Arc<SessionService>,
    popup: Arc<PopupService>,
    avatar_cache: Arc<dyn AvatarCachePort>,
}

impl SignOut {
    pub fn new(
        session: Arc<SessionService>,
        popup: Arc<PopupService>,
        avatar_cache: Arc<dyn AvatarCachePort>,
    ) -> Self {
        Self {
            session,
            popup,
            avatar_cache,
        }
    }

    pub async fn execute(&self) -> Result<()> {
        info!("signing out");
        self.session.clear().await?;
        self.popup.clear().await;
        self.avatar_cache.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bytes::Bytes;
    use onboard_core::session::SessionUser;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Mutex;

    struct MemoryKv(Mutex<HashMap<String, String>>);

    #[async_trait]
    impl onboard_core::ports::KvStorePort for MemoryKv {
        async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
            Ok(self.0.lock().await.get(key).cloned())
        }
        async fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
            self.0.lock().await.insert(key.into(), value.into());
            Ok(())
        }
        async fn remove(&self, key: &str) -> anyhow::Result<()> {
            self.0.lock().await.remove(key);
            Ok(())
        }
    }

    struct CountingCache {
        clears: AtomicUsize,
    }

    #[async_trait]
    impl AvatarCachePort for CountingCache {
        async fn load(&self) -> anyhow::Result<Option<Bytes>> {
            Ok(None)
        }
        async fn store(&self, _blob: &[u8]) -> anyhow::Result<()> {
            Ok(())
        }
        fn clear(&self) {
            self.clears.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn sign_out_clears_session_popups_and_cache() {
        let session = Arc::new(SessionService::new(Arc::new(MemoryKv(Mutex::new(
            HashMap::new(),
        )))));
        session.replace(SessionUser::default()).await;
        session.open_session().await.unwrap();

        let popup = Arc::new(PopupService::new());
        popup.alert("leftover").await;

        let cache = Arc::new(CountingCache {
            clears: AtomicUsize::new(0),
        });

        SignOut::new(session.clone(), popup.clone(), cache.clone())
            .execute()
            .await
            .unwrap();

        assert!(session.current().await.is_none());
        assert!(session.session_id().await.unwrap().is_none());
        assert!(popup.top().await.is_none());
        assert_eq!(cache.clears.load(Ordering::SeqCst), 1);
    }
}
