use crate::types::Project;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub mod conversions;
pub mod file_storage;
pub mod memory_storage;
pub mod persistent_types;

// Re-export for convenience
pub use file_storage::TomlFileStorage;
pub use memory_storage::MemoryStorage;
pub use persistent_types::*;

/// Key under which the project forest is stored by default
pub const DEFAULT_STORE_KEY: &str = "projects";

/// Blob store holding whole project forests under string keys.
///
/// `set` replaces the stored value wholesale; there are no partial writes.
#[async_trait::async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Load the forest stored under `key`, `None` if nothing was saved yet
    async fn get(&self, key: &str) -> Result<Option<Vec<Project>>, StorageError>;

    /// Replace whatever is stored under `key`
    async fn set(&self, key: &str, projects: &[Project]) -> Result<(), StorageError>;

    /// Initialize storage (create directories, etc.)
    async fn initialize_storage(&self) -> Result<(), StorageError>;
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub storage_type: StorageType,
    pub base_path: PathBuf,
    pub store_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            storage_type: StorageType::TomlFiles,
            base_path: dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".reqtree"),
            store_key: DEFAULT_STORE_KEY.to_string(),
        }
    }
}

/// Available storage types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageType {
    TomlFiles,
    Memory,
}

/// Storage errors
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Storage not initialized")]
    NotInitialized,
}

/// Storage manager that provides a unified interface
pub struct StorageManager {
    storage: Box<dyn KeyValueStore>,
    config: StorageConfig,
}

impl std::fmt::Debug for StorageManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageManager")
            .field("config", &self.config)
            .finish()
    }
}

impl StorageManager {
    /// Create a new storage manager with the specified configuration
    pub async fn new(config: StorageConfig) -> Result<Self, StorageError> {
        let storage: Box<dyn KeyValueStore> = match config.storage_type {
            StorageType::TomlFiles => Box::new(TomlFileStorage::new(config.base_path.clone())),
            StorageType::Memory => Box::new(MemoryStorage::new()),
        };

        storage.initialize_storage().await?;
        log::debug!("Storage ready: {:?}", config);

        Ok(Self { storage, config })
    }

    /// Create a new storage manager with default configuration
    pub async fn with_default_config() -> Result<Self, StorageError> {
        Self::new(StorageConfig::default()).await
    }

    pub fn storage(&self) -> &dyn KeyValueStore {
        self.storage.as_ref()
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    /// Hand the store over to its long-term owner
    pub fn into_storage(self) -> Box<dyn KeyValueStore> {
        self.storage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_config_defaults_missing_fields() {
        let config: StorageConfig = toml::from_str(r#"storage_type = "memory""#).unwrap();
        assert_eq!(config.storage_type, StorageType::Memory);
        assert_eq!(config.store_key, DEFAULT_STORE_KEY);
        assert!(config.base_path.ends_with(".reqtree"));
    }

    #[tokio::test]
    async fn test_memory_storage_manager() {
        let config = StorageConfig {
            storage_type: StorageType::Memory,
            ..StorageConfig::default()
        };
        let manager = StorageManager::new(config).await.unwrap();
        assert!(manager.storage().get(DEFAULT_STORE_KEY).await.unwrap().is_none());
        assert_eq!(manager.config().storage_type, StorageType::Memory);
    }
}
