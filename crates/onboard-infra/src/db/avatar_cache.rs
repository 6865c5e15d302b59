//! SQLite-backed avatar cache.
//!
//! One table, one key. Queries run on the blocking pool; `clear` is
//! fire-and-forget as the port demands.

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use diesel::prelude::*;
use tracing::warn;

use onboard_core::ports::{AvatarCachePort, AVATAR_CACHE_KEY};

use crate::db::pool::DbPool;
use crate::db::schema::blobs;

#[derive(Insertable)]
#[diesel(table_name = blobs)]
struct BlobRow {
    key: String,
    value: Vec<u8>,
    updated_at: i64,
}

pub struct SqliteAvatarCache {
    pool: DbPool,
}

impl SqliteAvatarCache {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AvatarCachePort for SqliteAvatarCache {
    async fn load(&self) -> Result<Option<Bytes>> {
        let pool = self.pool.clone();
        let value = tokio::task::spawn_blocking(move || -> Result<Option<Vec<u8>>> {
            let mut conn = pool.get()?;
            let value = blobs::table
                .filter(blobs::key.eq(AVATAR_CACHE_KEY))
                .select(blobs::value)
                .first::<Vec<u8>>(&mut conn)
                .optional()
                .map_err(|e| anyhow::anyhow!("avatar cache query failed: {}", e))?;
            Ok(value)
        })
        .await??;

        Ok(value.map(Bytes::from))
    }

    async fn store(&self, blob: &[u8]) -> Result<()> {
        let pool = self.pool.clone();
        let row = BlobRow {
            key: AVATAR_CACHE_KEY.to_string(),
            value: blob.to_vec(),
            updated_at: chrono::Utc::now().timestamp_millis(),
        };

        tokio::task::spawn_blocking(move || -> Result<()> {
            let mut conn = pool.get()?;
            // Single fixed key: last write wins.
            diesel::replace_into(blobs::table).values(&row).execute(&mut conn)?;
            Ok(())
        })
        .await??;

        Ok(())
    }

    fn clear(&self) {
        let pool = self.pool.clone();
        tokio::spawn(async move {
            let result = tokio::task::spawn_blocking(move || -> Result<()> {
                let mut conn = pool.get()?;
                diesel::delete(blobs::table.filter(blobs::key.eq(AVATAR_CACHE_KEY)))
                    .execute(&mut conn)?;
                Ok(())
            })
            .await;

            match result {
                Ok(Ok(())) => {}
                Ok(Err(error)) => warn!(%error, "avatar cache clear failed"),
                Err(error) => warn!(%error, "avatar cache clear task failed"),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::pool::init_db_pool;
    use tempfile::TempDir;

    fn cache_at(dir: &TempDir) -> SqliteAvatarCache {
        let db_path = dir.path().join("blobs.db");
        let pool = init_db_pool(db_path.to_str().unwrap()).unwrap();
        SqliteAvatarCache::new(pool)
    }

    #[tokio::test]
    async fn avatar_cache_load_is_none_when_absent() {
        let dir = TempDir::new().unwrap();
        let cache = cache_at(&dir);
        assert!(cache.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn avatar_cache_round_trips_byte_identical() {
        let dir = TempDir::new().unwrap();
        let cache = cache_at(&dir);

        let blob: Vec<u8> = (0u16..512).map(|i| (i % 251) as u8).collect();
        cache.store(&blob).await.unwrap();

        // Fresh pool over the same file, as after a reload.
        let reopened = cache_at(&dir);
        let loaded = reopened.load().await.unwrap().unwrap();
        assert_eq!(loaded.as_ref(), blob.as_slice());
    }

    #[tokio::test]
    async fn avatar_cache_store_overwrites_previous_entry() {
        let dir = TempDir::new().unwrap();
        let cache = cache_at(&dir);

        cache.store(b"first").await.unwrap();
        cache.store(b"second").await.unwrap();

        let loaded = cache.load().await.unwrap().unwrap();
        assert_eq!(loaded.as_ref(), b"second");
    }

    #[tokio::test]
    async fn avatar_cache_clear_eventually_removes_entry() {
        let dir = TempDir::new().unwrap();
        let cache = cache_at(&dir);
        cache.store(b"doomed").await.unwrap();

        cache.clear();

        // Fire-and-forget: poll briefly.
        for _ in 0..50 {
            if cache.load().await.unwrap().is_none() {
                return;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        panic!("cache entry was not cleared");
    }
}
