use super::persistent_types::*;
use crate::types::{Forest, Project};

/// Trait for converting in-memory types to persistent types
pub trait ToPersistent<T> {
    fn to_persistent(&self) -> T;
}

/// Trait for converting persistent types to in-memory types
pub trait FromPersistent<T> {
    fn from_persistent(persistent: T) -> Self;
}

impl ToPersistent<PersistedDocument> for [Project] {
    fn to_persistent(&self) -> PersistedDocument {
        PersistedDocument {
            metadata: DocumentMetadata::default(),
            projects: self.to_vec(),
        }
    }
}

impl FromPersistent<PersistedDocument> for Vec<Project> {
    fn from_persistent(persistent: PersistedDocument) -> Self {
        persistent.projects
    }
}

impl ToPersistent<PersistedDocument> for Forest {
    fn to_persistent(&self) -> PersistedDocument {
        self.projects().to_persistent()
    }
}

impl FromPersistent<PersistedDocument> for Forest {
    fn from_persistent(persistent: PersistedDocument) -> Self {
        Forest::new(Vec::<Project>::from_persistent(persistent))
    }
}
