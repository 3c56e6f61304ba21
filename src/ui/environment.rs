use crate::error::{Result, WorkspaceError};
use crate::types::{Environment, Forest};
use crate::ui::{ChoiceItem, PromptService};
use crate::url_path::normalize_base_url;
use log::info;

pub const NAME_PROMPT: &str = "Environment name";
pub const NAME_PLACEHOLDER: &str = "e.g. dev, staging, prod";
pub const BASE_URL_PROMPT: &str = "Base URL";
pub const BASE_URL_PLACEHOLDER: &str = "https://api.example.com";

/// What an environment command ended up doing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvironmentOutcome {
    Added { environment_id: String },
    Selected { environment_id: String },
    Cancelled,
    NoEnvironments,
}

impl EnvironmentOutcome {
    /// Whether the forest changed and has to be saved
    pub fn mutated(&self) -> bool {
        matches!(
            self,
            EnvironmentOutcome::Added { .. } | EnvironmentOutcome::Selected { .. }
        )
    }
}

/// Asks for a name and a base URL and appends the new environment to the
/// project. The first environment a project gets becomes its current one.
///
/// Saving and change notification are left to the caller.
pub async fn add_environment(
    forest: &mut Forest,
    project_id: &str,
    prompt: &dyn PromptService,
) -> Result<EnvironmentOutcome> {
    if forest.find_project_by_id(project_id).is_none() {
        return Err(WorkspaceError::ProjectNotFound(project_id.to_string()));
    }

    let Some(name) = non_blank(prompt.prompt_text(NAME_PROMPT, NAME_PLACEHOLDER).await) else {
        info!("Add environment cancelled at name prompt");
        return Ok(EnvironmentOutcome::Cancelled);
    };
    let Some(base_url) = non_blank(prompt.prompt_text(BASE_URL_PROMPT, BASE_URL_PLACEHOLDER).await)
    else {
        info!("Add environment cancelled at base URL prompt");
        return Ok(EnvironmentOutcome::Cancelled);
    };

    let project = forest
        .find_project_by_id_mut(project_id)
        .ok_or_else(|| WorkspaceError::ProjectNotFound(project_id.to_string()))?;

    let environment = Environment {
        id: uuid::Uuid::new_v4().to_string(),
        name,
        base_url: normalize_base_url(&base_url),
    };
    let environment_id = environment.id.clone();

    info!(
        "Adding environment {:?} ({}) to project {}",
        environment.name, environment.base_url, project.id
    );
    project.environments.get_or_insert_with(Vec::new).push(environment);
    if project.current_env_id.is_none() {
        project.current_env_id = Some(environment_id.clone());
    }

    Ok(EnvironmentOutcome::Added { environment_id })
}

/// Lets the user pick which of the project's environments is current.
pub async fn set_current_environment(
    forest: &mut Forest,
    project_id: &str,
    prompt: &dyn PromptService,
) -> Result<EnvironmentOutcome> {
    let project = forest
        .find_project_by_id(project_id)
        .ok_or_else(|| WorkspaceError::ProjectNotFound(project_id.to_string()))?;

    if project.environments().is_empty() {
        prompt.notify_info(&format!(
            "Project \"{}\" has no environments yet, add one first",
            project.name
        ));
        return Ok(EnvironmentOutcome::NoEnvironments);
    }

    let options: Vec<ChoiceItem> = project
        .environments()
        .iter()
        .map(|env| ChoiceItem {
            label: env.name.clone(),
            description: env.base_url.clone(),
        })
        .collect();

    let Some(index) = prompt.prompt_choice(&options).await else {
        info!("Environment selection cancelled");
        return Ok(EnvironmentOutcome::Cancelled);
    };

    let project = forest
        .find_project_by_id_mut(project_id)
        .ok_or_else(|| WorkspaceError::ProjectNotFound(project_id.to_string()))?;

    let Some(environment_id) = project.environments().get(index).map(|env| env.id.clone()) else {
        log::warn!("Selection {} is out of range, ignoring", index);
        return Ok(EnvironmentOutcome::Cancelled);
    };

    info!("Project {} now uses environment {}", project.id, environment_id);
    project.current_env_id = Some(environment_id.clone());

    Ok(EnvironmentOutcome::Selected { environment_id })
}

fn non_blank(answer: Option<String>) -> Option<String> {
    answer
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Project;
    use crate::ui::prompt::testing::ScriptedPrompt;

    fn forest_with(project: Project) -> Forest {
        Forest::new(vec![project])
    }

    fn env(id: &str, name: &str, base_url: &str) -> Environment {
        Environment {
            id: id.to_string(),
            name: name.to_string(),
            base_url: base_url.to_string(),
        }
    }

    #[tokio::test]
    async fn test_add_first_environment_becomes_current() {
        let mut forest = forest_with(Project::new("p1", "API"));
        let prompt = ScriptedPrompt::with_text(&[Some(" prod "), Some("https://api.example.com/")]);

        let outcome = add_environment(&mut forest, "p1", &prompt).await.unwrap();

        let project = &forest.projects()[0];
        assert_eq!(project.environments().len(), 1);
        let added = &project.environments()[0];
        assert_eq!(added.name, "prod");
        assert_eq!(added.base_url, "https://api.example.com");
        assert_eq!(project.current_env_id.as_deref(), Some(added.id.as_str()));
        assert_eq!(outcome, EnvironmentOutcome::Added { environment_id: added.id.clone() });
        assert_eq!(*prompt.asked.lock().unwrap(), vec![NAME_PROMPT, BASE_URL_PROMPT]);
    }

    #[tokio::test]
    async fn test_add_later_environment_keeps_current() {
        let mut project = Project::new("p1", "API");
        project.environments = Some(vec![env("e1", "dev", "https://dev.example.com")]);
        project.current_env_id = Some("e1".to_string());
        let mut forest = forest_with(project);
        let prompt = ScriptedPrompt::with_text(&[Some("prod"), Some("https://api.example.com")]);

        add_environment(&mut forest, "p1", &prompt).await.unwrap();

        let project = &forest.projects()[0];
        assert_eq!(project.environments().len(), 2);
        assert_eq!(project.environments()[1].name, "prod");
        assert_eq!(project.current_env_id.as_deref(), Some("e1"));
    }

    #[tokio::test]
    async fn test_add_environment_ids_are_unique() {
        let mut forest = forest_with(Project::new("p1", "API"));
        let prompt = ScriptedPrompt::with_text(&[
            Some("a"),
            Some("https://a.example.com"),
            Some("b"),
            Some("https://b.example.com"),
        ]);

        add_environment(&mut forest, "p1", &prompt).await.unwrap();
        add_environment(&mut forest, "p1", &prompt).await.unwrap();

        let envs = forest.projects()[0].environments();
        assert_ne!(envs[0].id, envs[1].id);
    }

    #[tokio::test]
    async fn test_add_environment_cancelled_at_name() {
        let mut forest = forest_with(Project::new("p1", "API"));
        let before = forest.clone();
        let prompt = ScriptedPrompt::with_text(&[Some("   ")]);

        let outcome = add_environment(&mut forest, "p1", &prompt).await.unwrap();

        assert_eq!(outcome, EnvironmentOutcome::Cancelled);
        assert!(!outcome.mutated());
        assert_eq!(forest, before);
        assert_eq!(prompt.asked.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_add_environment_cancelled_at_base_url() {
        let mut forest = forest_with(Project::new("p1", "API"));
        let before = forest.clone();
        let prompt = ScriptedPrompt::with_text(&[Some("prod"), None]);

        let outcome = add_environment(&mut forest, "p1", &prompt).await.unwrap();

        assert_eq!(outcome, EnvironmentOutcome::Cancelled);
        assert_eq!(forest, before);
        assert!(forest.projects()[0].environments.is_none());
    }

    #[tokio::test]
    async fn test_add_environment_unknown_project() {
        let mut forest = forest_with(Project::new("p1", "API"));
        let prompt = ScriptedPrompt::with_text(&[Some("prod"), Some("https://api.example.com")]);

        let err = add_environment(&mut forest, "p2", &prompt).await.unwrap_err();
        assert!(matches!(err, WorkspaceError::ProjectNotFound(id) if id == "p2"));
        assert!(prompt.asked.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_set_current_without_environments_informs() {
        let mut forest = forest_with(Project::new("p1", "API"));
        let before = forest.clone();
        let prompt = ScriptedPrompt::with_choice(Some(0));

        let outcome = set_current_environment(&mut forest, "p1", &prompt).await.unwrap();

        assert_eq!(outcome, EnvironmentOutcome::NoEnvironments);
        assert_eq!(forest, before);
        assert_eq!(prompt.infos.lock().unwrap().len(), 1);
        assert!(prompt.offered.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_set_current_environment_selects_choice() {
        let mut project = Project::new("p1", "API");
        project.environments = Some(vec![
            env("e1", "dev", "https://dev.example.com"),
            env("e2", "prod", "https://api.example.com"),
        ]);
        let mut forest = forest_with(project);
        let prompt = ScriptedPrompt::with_choice(Some(1));

        let outcome = set_current_environment(&mut forest, "p1", &prompt).await.unwrap();

        assert_eq!(outcome, EnvironmentOutcome::Selected { environment_id: "e2".to_string() });
        assert_eq!(forest.projects()[0].current_env_id.as_deref(), Some("e2"));
        assert_eq!(
            *prompt.offered.lock().unwrap(),
            vec![
                ChoiceItem { label: "dev".to_string(), description: "https://dev.example.com".to_string() },
                ChoiceItem { label: "prod".to_string(), description: "https://api.example.com".to_string() },
            ]
        );
    }

    #[tokio::test]
    async fn test_set_current_environment_cancelled() {
        let mut project = Project::new("p1", "API");
        project.environments = Some(vec![env("e1", "dev", "https://dev.example.com")]);
        let mut forest = forest_with(project);
        let before = forest.clone();
        let prompt = ScriptedPrompt::with_choice(None);

        let outcome = set_current_environment(&mut forest, "p1", &prompt).await.unwrap();

        assert_eq!(outcome, EnvironmentOutcome::Cancelled);
        assert_eq!(forest, before);
    }
}
