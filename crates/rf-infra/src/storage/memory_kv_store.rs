use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use rf_core::error::RawError;
use rf_core::ports::KeyValueStorePort;

/// Process-local store, used when no state file is configured.
///
/// `set_unavailable(true)` makes every call fail, which lets callers exercise
/// their storage-failure paths.
#[derive(Default)]
pub struct MemoryKeyValueStore {
    entries: RwLock<HashMap<String, String>>,
    unavailable: AtomicBool,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), RawError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(RawError::with_code(
                "STORAGE_UNAVAILABLE",
                "key-value store is unavailable",
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStorePort for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, RawError> {
        self.check()?;
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), RawError> {
        self.check()?;
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), RawError> {
        self.check()?;
        self.entries.write().await.remove(key);
        Ok(())
    }
}
