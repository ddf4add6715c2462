use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

use rf_core::error::RawError;
use rf_core::ports::KeyValueStorePort;

/// Key-value store kept as one JSON object on disk.
///
/// Writes go to a temporary file next to the target and are renamed over it,
/// so the file is always either the previous or the new content.
pub struct FileKeyValueStore {
    path: PathBuf,
    // Serializes read-modify-write cycles.
    write_lock: Mutex<()>,
}

impl FileKeyValueStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .await
                .with_context(|| format!("create store dir failed: {}", dir.display()))?;
        }
        Ok(())
    }

    async fn load_all(&self) -> Result<BTreeMap<String, String>> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(e).with_context(|| format!("read store failed: {}", self.path.display()))
            }
        };
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content)
            .with_context(|| format!("parse store failed: {}", self.path.display()))
    }

    async fn atomic_write(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        self.ensure_parent_dir().await?;

        let content = serde_json::to_string_pretty(entries).context("serialize store failed")?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, content)
            .await
            .with_context(|| format!("write temp store failed: {}", tmp_path.display()))?;

        fs::rename(&tmp_path, &self.path).await.with_context(|| {
            format!(
                "rename temp store to target failed: {} -> {}",
                tmp_path.display(),
                self.path.display()
            )
        })?;
        Ok(())
    }

    async fn modify(&self, f: impl FnOnce(&mut BTreeMap<String, String>)) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.load_all().await?;
        f(&mut entries);
        self.atomic_write(&entries).await
    }
}

fn to_raw(code: &str, err: anyhow::Error) -> RawError {
    RawError::with_code(code, format!("{err:#}"))
}

#[async_trait]
impl KeyValueStorePort for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, RawError> {
        let entries = self
            .load_all()
            .await
            .map_err(|e| to_raw("STORAGE_READ_FAILED", e))?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), RawError> {
        self.modify(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
        .await
        .map_err(|e| to_raw("STORAGE_WRITE_FAILED", e))?;
        debug!(key, path = %self.path.display(), "stored value");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), RawError> {
        self.modify(|entries| {
            entries.remove(key);
        })
        .await
        .map_err(|e| to_raw("STORAGE_WRITE_FAILED", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn missing_file_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::new(dir.path().join("state.json"));

        assert_eq!(store.get("anything").await.unwrap(), None);
    }

    #[tokio::test]
    async fn set_get_remove_round_trip_through_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("state.json");
        let store = FileKeyValueStore::new(&path);

        store.set("a", "1").await.unwrap();
        store.set("b", "2").await.unwrap();
        store.remove("a").await.unwrap();

        let reopened = FileKeyValueStore::new(&path);
        assert_eq!(reopened.get("a").await.unwrap(), None);
        assert_eq!(reopened.get("b").await.unwrap(), Some("2".to_string()));
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn corrupt_file_is_a_read_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = FileKeyValueStore::new(&path).get("a").await.unwrap_err();
        assert_eq!(err.code(), Some("STORAGE_READ_FAILED"));
    }
}
