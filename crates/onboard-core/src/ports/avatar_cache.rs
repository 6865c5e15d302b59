//! Avatar cache port.
//!
//! A single-entry local blob cache so a partially completed wizard survives
//! an accidental reload. Cache, not source-of-truth data.

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;

/// The one key the cache ever holds.
pub const AVATAR_CACHE_KEY: &str = "avatar";

#[async_trait]
pub trait AvatarCachePort: Send + Sync {
    /// Read the cached avatar blob; `None` when absent.
    async fn load(&self) -> Result<Option<Bytes>>;

    /// Upsert the cached avatar blob. Last write wins.
    async fn store(&self, blob: &[u8]) -> Result<()>;

    /// Delete the cached entry, fire-and-forget: errors are unobserved.
    fn clear(&self);
}

#[async_trait]
impl<T: AvatarCachePort + ?Sized> AvatarCachePort for Arc<T> {
    async fn load(&self) -> Result<Option<Bytes>> {
        (**self).load().await
    }

    async fn store(&self, blob: &[u8]) -> Result<()> {
        (**self).store(blob).await
    }

    fn clear(&self) {
        (**self).clear()
    }
}
