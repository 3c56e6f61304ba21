use crate::error::Result;
use crate::storage::{KeyValueStore, StorageError};
use crate::types::{Forest, Project, ProjectChild};
use crate::ui::{self, DisplayAttributes, EnvironmentOutcome, PromptService, TreeNode};
use log::{debug, info, warn};
use std::sync::Arc;
use tokio::sync::watch;

/// Payload-free "something changed" broadcast.
///
/// Subscribers only learn that the tree has to be re-queried; the counter
/// exists so a receiver can tell it missed nothing.
#[derive(Debug)]
pub struct ChangeNotifier {
    sender: watch::Sender<u64>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(0);
        Self { sender }
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.sender.subscribe()
    }

    pub fn notify(&self) {
        self.sender.send_modify(|generation| *generation += 1);
    }

    /// Number of notifications fired so far
    pub fn generation(&self) -> u64 {
        *self.sender.borrow()
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything the host talks to: the loaded forest plus its store, the
/// prompt service and the change notifier.
///
/// Every mutating call saves the whole forest before firing the change
/// notification.
pub struct Workspace {
    forest: Forest,
    store: Arc<dyn KeyValueStore>,
    store_key: String,
    prompt: Arc<dyn PromptService>,
    notifier: ChangeNotifier,
}

impl std::fmt::Debug for Workspace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workspace")
            .field("store_key", &self.store_key)
            .field("projects", &self.forest.projects().len())
            .finish()
    }
}

impl Workspace {
    /// Load the forest stored under `store_key`, seeding and saving the
    /// example forest when the store has none.
    pub async fn load(
        store: Arc<dyn KeyValueStore>,
        store_key: impl Into<String>,
        prompt: Arc<dyn PromptService>,
    ) -> Result<Self> {
        let store_key = store_key.into();

        let forest = match store.get(&store_key).await? {
            Some(projects) => {
                info!("Loaded {} projects from store key {:?}", projects.len(), store_key);
                Forest::new(projects)
            }
            None => {
                info!("Nothing stored under {:?}, seeding example project", store_key);
                let seed = Forest::default_seed();
                store.set(&store_key, seed.projects()).await?;
                seed
            }
        };

        let unrecognized = forest
            .projects()
            .iter()
            .flat_map(|project| project.children.iter())
            .filter(|child| matches!(child, ProjectChild::Unrecognized(_)))
            .count();
        if unrecognized > 0 {
            warn!("{} stored nodes have an unrecognized shape", unrecognized);
        }

        Ok(Self {
            forest,
            store,
            store_key,
            prompt,
            notifier: ChangeNotifier::new(),
        })
    }

    pub fn forest(&self) -> &Forest {
        &self.forest
    }

    pub fn store_key(&self) -> &str {
        &self.store_key
    }

    pub fn root_projects(&self) -> &[Project] {
        self.forest.projects()
    }

    pub fn children(&self, node: Option<&TreeNode>) -> Vec<TreeNode> {
        ui::children(&self.forest, node)
    }

    pub fn display_attributes(&self, node: &TreeNode) -> DisplayAttributes {
        ui::display_attributes(&self.forest, node)
    }

    pub async fn add_environment(&mut self, project_id: &str) -> Result<EnvironmentOutcome> {
        let outcome = ui::add_environment(&mut self.forest, project_id, self.prompt.as_ref()).await?;
        self.commit(&outcome).await?;
        Ok(outcome)
    }

    pub async fn set_current_environment(&mut self, project_id: &str) -> Result<EnvironmentOutcome> {
        let outcome =
            ui::set_current_environment(&mut self.forest, project_id, self.prompt.as_ref()).await?;
        self.commit(&outcome).await?;
        Ok(outcome)
    }

    /// Ask subscribers to re-query without changing anything
    pub fn refresh(&self) {
        debug!("Refresh requested");
        self.notifier.notify();
    }

    /// Write the whole forest back to the store
    pub async fn persist(&self) -> std::result::Result<(), StorageError> {
        self.store.set(&self.store_key, self.forest.projects()).await
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.notifier.subscribe()
    }

    pub fn notifier(&self) -> &ChangeNotifier {
        &self.notifier
    }

    async fn commit(&self, outcome: &EnvironmentOutcome) -> Result<()> {
        if !outcome.mutated() {
            return Ok(());
        }

        if let Err(e) = self.persist().await {
            log::error!("Failed to save projects: {}", e);
            return Err(e.into());
        }
        self.notifier.notify();
        Ok(())
    }
}
