use crate::types::Project;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Format version written into every document
pub const DOCUMENT_VERSION: &str = "1.0";

/// On-disk envelope around a stored project forest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedDocument {
    #[serde(default)]
    pub metadata: DocumentMetadata,
    #[serde(default)]
    pub projects: Vec<Project>,
}

/// Metadata for a stored document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub version: String,
    pub modified_at: String,
}

impl Default for DocumentMetadata {
    fn default() -> Self {
        Self {
            version: DOCUMENT_VERSION.to_string(),
            modified_at: Utc::now().to_rfc3339(),
        }
    }
}
