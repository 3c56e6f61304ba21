use log::warn;
use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// Method shown for interfaces that don't store one.
pub const DEFAULT_METHOD: &str = "GET";

/// Root-level container in the hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    // Plain values ahead of arrays of tables, so TOML can write them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_env_id: Option<String>,
    pub children: Vec<ProjectChild>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environments: Option<Vec<Environment>>,
}

impl Project {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            current_env_id: None,
            children: Vec::new(),
            environments: None,
        }
    }

    /// Environments in insertion order, empty when the field was never set.
    pub fn environments(&self) -> &[Environment] {
        self.environments.as_deref().unwrap_or_default()
    }
}

/// A named grouping of interfaces under a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: String,
    pub name: String,
    pub parent_id: String,
    pub children: Vec<Interface>,
}

/// A single endpoint definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interface {
    pub id: String,
    pub name: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    pub parent_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_body: Option<String>,
}

impl Interface {
    pub fn method(&self) -> &str {
        self.method.as_deref().unwrap_or(DEFAULT_METHOD)
    }
}

/// A named base URL scoped to one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
    pub id: String,
    pub name: String,
    pub base_url: String,
}

/// Entry of a project's `children` array.
///
/// Persisted children carry no explicit kind, so decoding classifies each
/// record by the fields it has. Records that match neither shape are kept
/// verbatim in `Unrecognized` so they survive a load/save cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectChild {
    Collection(Collection),
    Interface(Interface),
    Unrecognized(serde_json::Map<String, serde_json::Value>),
}

impl ProjectChild {
    pub fn id(&self) -> Option<&str> {
        match self {
            ProjectChild::Collection(collection) => Some(&collection.id),
            ProjectChild::Interface(interface) => Some(&interface.id),
            ProjectChild::Unrecognized(fields) => fields.get("id").and_then(|id| id.as_str()),
        }
    }
}

/// Kind a persisted child record decodes to, judged by field presence only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordShape {
    Project,
    Collection,
    Interface,
    Unknown,
}

/// Classifies an untyped record.
///
/// `children` (array) without `parentId` is a project, `parentId` with a
/// `children` array is a collection, `parentId` with `url` and no `children`
/// is an interface.
pub fn classify_record(fields: &serde_json::Map<String, serde_json::Value>) -> RecordShape {
    let has_children_array = fields.get("children").is_some_and(|c| c.is_array());
    let has_children = fields.contains_key("children");
    let has_parent = fields.contains_key("parentId");

    match (has_parent, has_children_array) {
        (false, true) => RecordShape::Project,
        (true, true) => RecordShape::Collection,
        (true, false) if !has_children && fields.contains_key("url") => RecordShape::Interface,
        _ => RecordShape::Unknown,
    }
}

impl<'de> Deserialize<'de> for ProjectChild {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let fields = serde_json::Map::<String, serde_json::Value>::deserialize(deserializer)?;
        let raw = serde_json::Value::Object(fields.clone());

        let decoded = match classify_record(&fields) {
            RecordShape::Collection => serde_json::from_value(raw).map(ProjectChild::Collection),
            RecordShape::Interface => serde_json::from_value(raw).map(ProjectChild::Interface),
            RecordShape::Project | RecordShape::Unknown => {
                return Ok(ProjectChild::Unrecognized(fields));
            }
        };

        Ok(decoded.unwrap_or_else(|e| {
            warn!("Keeping malformed child record as unrecognized: {}", e);
            ProjectChild::Unrecognized(fields)
        }))
    }
}

impl Serialize for ProjectChild {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            ProjectChild::Collection(collection) => collection.serialize(serializer),
            ProjectChild::Interface(interface) => interface.serialize(serializer),
            ProjectChild::Unrecognized(fields) => fields.serialize(serializer),
        }
    }
}

/// Implemented by nodes that point at a parent project or collection.
pub trait Parented {
    fn parent_id(&self) -> &str;
}

impl Parented for Collection {
    fn parent_id(&self) -> &str {
        &self.parent_id
    }
}

impl Parented for Interface {
    fn parent_id(&self) -> &str {
        &self.parent_id
    }
}

/// The whole project hierarchy, owned as a single aggregate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Forest {
    projects: Vec<Project>,
}

impl Forest {
    pub fn new(projects: Vec<Project>) -> Self {
        Self { projects }
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn projects_mut(&mut self) -> &mut Vec<Project> {
        &mut self.projects
    }

    pub fn into_projects(self) -> Vec<Project> {
        self.projects
    }

    /// Forest written to a store that has nothing saved yet.
    pub fn default_seed() -> Self {
        let project_id = "project-example";
        let collection_id = "collection-users";

        let users = Collection {
            id: collection_id.to_string(),
            name: "Users".to_string(),
            parent_id: project_id.to_string(),
            children: vec![
                Interface {
                    id: "interface-list-users".to_string(),
                    name: "List users".to_string(),
                    url: "https://jsonplaceholder.typicode.com/users".to_string(),
                    method: Some("GET".to_string()),
                    parent_id: collection_id.to_string(),
                    request_body: None,
                    response_body: Some(r#"[{"id": 1, "name": "Leanne Graham"}]"#.to_string()),
                },
                Interface {
                    id: "interface-create-user".to_string(),
                    name: "Create user".to_string(),
                    url: "https://jsonplaceholder.typicode.com/users".to_string(),
                    method: Some("POST".to_string()),
                    parent_id: collection_id.to_string(),
                    request_body: Some(r#"{"name": "Ervin Howell"}"#.to_string()),
                    response_body: Some(r#"{"id": 11, "name": "Ervin Howell"}"#.to_string()),
                },
            ],
        };

        let todo = Interface {
            id: "interface-get-todo".to_string(),
            name: "Get todo".to_string(),
            url: "https://jsonplaceholder.typicode.com/todos/1".to_string(),
            method: None,
            parent_id: project_id.to_string(),
            request_body: None,
            response_body: None,
        };

        let environment = Environment {
            id: "env-example".to_string(),
            name: "Example".to_string(),
            base_url: "https://jsonplaceholder.typicode.com".to_string(),
        };

        let mut project = Project::new(project_id, "Example Project");
        project.children = vec![ProjectChild::Collection(users), ProjectChild::Interface(todo)];
        project.environments = Some(vec![environment]);
        project.current_env_id = Some("env-example".to_string());

        Self::new(vec![project])
    }
}
