//! File-based key-value store.
//!
//! Persists a flat string map to a local JSON file in the application data
//! directory. Write-through: every mutation rewrites the file.

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use onboard_core::ports::KvStorePort;

pub const DEFAULT_KV_FILE: &str = ".session_store";

pub struct FileKvStore {
    store_file_path: PathBuf,
    entries: Mutex<Option<HashMap<String, String>>>,
}

impl FileKvStore {
    /// Create a store with a custom file path.
    pub fn new(store_file_path: PathBuf) -> Self {
        Self {
            store_file_path,
            entries: Mutex::new(None),
        }
    }

    /// Create a store with base dir and the default filename.
    pub fn with_defaults(base_dir: PathBuf) -> Self {
        Self::new(base_dir.join(DEFAULT_KV_FILE))
    }

    async fn ensure_parent_dir(&self) -> anyhow::Result<()> {
        if let Some(parent) = self.store_file_path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Load the map lazily on first access; missing or empty files read as
    /// an empty map.
    async fn load_entries(&self) -> anyhow::Result<HashMap<String, String>> {
        if !self.store_file_path.exists() {
            return Ok(HashMap::new());
        }

        let content = fs::read_to_string(&self.store_file_path).await?;
        if content.trim().is_empty() {
            return Ok(HashMap::new());
        }

        serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse kv store file: {}", e))
    }

    async fn persist(&self, entries: &HashMap<String, String>) -> anyhow::Result<()> {
        self.ensure_parent_dir().await?;

        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| anyhow::anyhow!("Failed to serialize kv store: {}", e))?;

        let mut file = fs::File::create(&self.store_file_path)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to create kv store file: {}", e))?;
        file.write_all(json.as_bytes())
            .await
            .map_err(|e| anyhow::anyhow!("Failed to write kv store file: {}", e))?;
        file.flush().await?;

        Ok(())
    }

    async fn with_entries<T>(
        &self,
        f: impl FnOnce(&mut HashMap<String, String>) -> T,
    ) -> anyhow::Result<(T, HashMap<String, String>)> {
        let mut guard = self.entries.lock().await;
        if guard.is_none() {
            *guard = Some(self.load_entries().await?);
        }
        let entries = guard.get_or_insert_with(HashMap::new);
        let out = f(entries);
        Ok((out, entries.clone()))
    }
}

#[async_trait]
impl KvStorePort for FileKvStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let (value, _) = self.with_entries(|entries| entries.get(key).cloned()).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let (_, entries) = self
            .with_entries(|entries| {
                entries.insert(key.to_string(), value.to_string());
            })
            .await?;
        self.persist(&entries).await
    }

    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        let (removed, entries) = self
            .with_entries(|entries| entries.remove(key).is_some())
            .await?;
        if removed {
            self.persist(&entries).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn file_kv_store_round_trips_values() {
        let dir = TempDir::new().unwrap();
        let store = FileKvStore::with_defaults(dir.path().to_path_buf());

        assert!(store.get("missing").await.unwrap().is_none());

        store.set("session_id", "abc-123").await.unwrap();
        assert_eq!(
            store.get("session_id").await.unwrap().as_deref(),
            Some("abc-123")
        );
    }

    #[tokio::test]
    async fn file_kv_store_survives_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let store = FileKvStore::with_defaults(dir.path().to_path_buf());
            store.set("remembered_username", "a@example.com").await.unwrap();
        }

        let reopened = FileKvStore::with_defaults(dir.path().to_path_buf());
        assert_eq!(
            reopened
                .get("remembered_username")
                .await
                .unwrap()
                .as_deref(),
            Some("a@example.com")
        );
    }

    #[tokio::test]
    async fn file_kv_store_remove_is_noop_for_missing_key() {
        let dir = TempDir::new().unwrap();
        let store = FileKvStore::with_defaults(dir.path().to_path_buf());
        store.remove("missing").await.unwrap();

        store.set("key", "value").await.unwrap();
        store.remove("key").await.unwrap();
        assert!(store.get("key").await.unwrap().is_none());
    }
}
