//! Read-only lookups over the project forest.
//!
//! Nothing here fails: a dangling `parentId` or an unknown environment id
//! just resolves to `None`, and callers treat that as "no environment
//! context".

use crate::types::{Collection, Environment, Forest, Interface, Parented, Project, ProjectChild};
use log::debug;

impl Forest {
    pub fn find_project_by_id(&self, id: &str) -> Option<&Project> {
        self.projects().iter().find(|project| project.id == id)
    }

    pub fn find_project_by_id_mut(&mut self, id: &str) -> Option<&mut Project> {
        self.projects_mut().iter_mut().find(|project| project.id == id)
    }

    /// Project owning a collection or interface.
    ///
    /// Tries `parent_id` as a project id first, then as the id of a
    /// collection directly under some project. The fallback assumes
    /// collection ids are unique across all projects; the first match wins.
    pub fn find_owning_project<N: Parented + ?Sized>(&self, node: &N) -> Option<&Project> {
        let parent_id = node.parent_id();
        if let Some(project) = self.find_project_by_id(parent_id) {
            return Some(project);
        }

        let owner = self.projects().iter().find(|project| {
            project.children.iter().any(|child| {
                matches!(child, ProjectChild::Collection(collection) if collection.id == parent_id)
            })
        });

        if owner.is_none() {
            debug!("No project owns parent id {:?}", parent_id);
        }
        owner
    }

    pub fn find_collection(&self, id: &str) -> Option<&Collection> {
        self.projects()
            .iter()
            .flat_map(|project| project.children.iter())
            .find_map(|child| match child {
                ProjectChild::Collection(collection) if collection.id == id => Some(collection),
                _ => None,
            })
    }

    /// Interface by id, whether it sits directly under a project or inside
    /// a collection.
    pub fn find_interface(&self, id: &str) -> Option<&Interface> {
        self.projects()
            .iter()
            .flat_map(|project| project.children.iter())
            .find_map(|child| match child {
                ProjectChild::Interface(interface) if interface.id == id => Some(interface),
                ProjectChild::Collection(collection) => {
                    collection.children.iter().find(|interface| interface.id == id)
                }
                _ => None,
            })
    }
}

/// Environment currently in effect for `project`.
///
/// An unset `current_env_id` falls back to the first environment. This is a
/// display fallback only, nothing is written back to the project.
pub fn active_environment(project: &Project) -> Option<&Environment> {
    let environments = project.environments();
    match &project.current_env_id {
        Some(id) => environments.iter().find(|env| &env.id == id),
        None => environments.first(),
    }
}

pub fn active_base_url(project: &Project) -> Option<&str> {
    active_environment(project).map(|env| env.base_url.as_str())
}
