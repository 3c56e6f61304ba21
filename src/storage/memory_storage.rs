use super::{KeyValueStore, StorageError};
use crate::types::Project;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Process-local store, nothing survives a restart
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, Vec<Project>>>,
    writes: AtomicUsize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with `projects` under `key`
    pub fn with_entry(key: &str, projects: Vec<Project>) -> Self {
        let storage = Self::default();
        if let Ok(mut entries) = storage.entries.lock() {
            entries.insert(key.to_string(), projects);
        }
        storage
    }

    /// Number of successful `set` calls so far
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl KeyValueStore for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<Vec<Project>>, StorageError> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| StorageError::InvalidFormat(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, projects: &[Project]) -> Result<(), StorageError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| StorageError::InvalidFormat(e.to_string()))?;
        entries.insert(key.to_string(), projects.to_vec());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn initialize_storage(&self) -> Result<(), StorageError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Forest;

    #[tokio::test]
    async fn test_set_counts_writes() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.write_count(), 0);

        storage.set("projects", Forest::default_seed().projects()).await.unwrap();
        storage.set("projects", &[]).await.unwrap();

        assert_eq!(storage.write_count(), 2);
        assert_eq!(storage.get("projects").await.unwrap(), Some(Vec::new()));
        assert_eq!(storage.get("other").await.unwrap(), None);
    }
}
