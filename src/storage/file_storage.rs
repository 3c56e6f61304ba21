use super::conversions::{FromPersistent, ToPersistent};
use super::{KeyValueStore, PersistedDocument, StorageError};
use crate::types::Project;
use log::{debug, info};
use std::path::PathBuf;
use tokio::fs;

/// TOML-based file storage implementation, one file per key
pub struct TomlFileStorage {
    base_path: PathBuf,
}

impl TomlFileStorage {
    /// Create a new TOML file storage instance
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    /// Get the path of the file holding `key`
    fn entry_path(&self, key: &str) -> PathBuf {
        self.base_path.join(format!("{}.toml", sanitize_filename(key)))
    }
}

#[async_trait::async_trait]
impl KeyValueStore for TomlFileStorage {
    async fn get(&self, key: &str) -> Result<Option<Vec<Project>>, StorageError> {
        let path = self.entry_path(key);
        if !path.exists() {
            debug!("No stored entry at {}", path.display());
            return Ok(None);
        }

        let content = fs::read_to_string(&path).await?;
        let document: PersistedDocument = toml::from_str(&content)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;

        debug!(
            "Loaded {} projects from {} (version {}, modified {})",
            document.projects.len(),
            path.display(),
            document.metadata.version,
            document.metadata.modified_at
        );

        Ok(Some(Vec::<Project>::from_persistent(document)))
    }

    async fn set(&self, key: &str, projects: &[Project]) -> Result<(), StorageError> {
        // Create base directory only when saving
        fs::create_dir_all(&self.base_path).await?;

        let document: PersistedDocument = projects.to_persistent();
        let content = toml::to_string_pretty(&document)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;

        // Write next to the target and rename, so readers never see half a file
        let path = self.entry_path(key);
        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content).await?;
        fs::rename(&tmp_path, &path).await?;

        info!("Saved {} projects to {}", projects.len(), path.display());
        Ok(())
    }

    async fn initialize_storage(&self) -> Result<(), StorageError> {
        // Directories are created on first write
        Ok(())
    }
}

/// Sanitize a filename by removing invalid characters
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
        .collect()
}
