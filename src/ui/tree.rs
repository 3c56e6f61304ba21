use crate::navigator::active_base_url;
use crate::types::{Forest, Interface, ProjectChild};
use crate::ui::IconName;
use crate::url_path::relative_path;
use log::debug;

pub const REQUEST_BODY_LABEL: &str = "Request Body";
pub const RESPONSE_BODY_LABEL: &str = "Response Body";
pub const NO_REQUEST_BODY: &str = "No request body";
pub const NO_RESPONSE_BODY: &str = "No response body";
pub const PROJECT_TOOLTIP: &str = "Project";
pub const COLLECTION_TOOLTIP: &str = "Collection";
pub const UNKNOWN_LABEL: &str = "unknown";

/// A node of the presented tree.
///
/// Nodes refer to forest entries by id and never own them. Body nodes are
/// synthesized per interface and have no persisted counterpart.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TreeNode {
    Project { id: String },
    Collection { id: String },
    Interface { id: String },
    RequestBody { interface_id: String },
    ResponseBody { interface_id: String },
    /// Persisted child record of a project that matches no known shape.
    Unrecognized { project_id: String, index: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpandState {
    Expanded,
    Collapsed,
    None,
}

/// Tag the host uses to decide which commands apply to a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionTag {
    Project,
    Collection,
    Interface,
    RequestBody,
    ResponseBody,
    Unknown,
}

impl InteractionTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionTag::Project => "project",
            InteractionTag::Collection => "collection",
            InteractionTag::Interface => "interface",
            InteractionTag::RequestBody => "requestBody",
            InteractionTag::ResponseBody => "responseBody",
            InteractionTag::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayAttributes {
    pub label: String,
    pub expand_state: ExpandState,
    pub icon: Option<IconName>,
    pub description: String,
    pub tooltip: String,
    pub interaction_tag: InteractionTag,
}

impl DisplayAttributes {
    fn unknown() -> Self {
        Self {
            label: UNKNOWN_LABEL.to_string(),
            expand_state: ExpandState::None,
            icon: None,
            description: String::new(),
            tooltip: String::new(),
            interaction_tag: InteractionTag::Unknown,
        }
    }
}

/// Ordered children of `node`; `None` asks for the root projects.
pub fn children(forest: &Forest, node: Option<&TreeNode>) -> Vec<TreeNode> {
    let node = match node {
        Some(node) => node,
        None => {
            return forest
                .projects()
                .iter()
                .map(|project| TreeNode::Project { id: project.id.clone() })
                .collect();
        }
    };

    match node {
        TreeNode::Project { id } => forest
            .find_project_by_id(id)
            .map(|project| {
                project
                    .children
                    .iter()
                    .enumerate()
                    .map(|(index, child)| match child {
                        ProjectChild::Collection(collection) => TreeNode::Collection {
                            id: collection.id.clone(),
                        },
                        ProjectChild::Interface(interface) => TreeNode::Interface {
                            id: interface.id.clone(),
                        },
                        ProjectChild::Unrecognized(_) => TreeNode::Unrecognized {
                            project_id: project.id.clone(),
                            index,
                        },
                    })
                    .collect()
            })
            .unwrap_or_default(),
        TreeNode::Collection { id } => forest
            .find_collection(id)
            .map(|collection| {
                collection
                    .children
                    .iter()
                    .map(|interface| TreeNode::Interface {
                        id: interface.id.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default(),
        TreeNode::Interface { id } => vec![
            TreeNode::RequestBody {
                interface_id: id.clone(),
            },
            TreeNode::ResponseBody {
                interface_id: id.clone(),
            },
        ],
        TreeNode::RequestBody { .. } | TreeNode::ResponseBody { .. } | TreeNode::Unrecognized { .. } => {
            Vec::new()
        }
    }
}

/// Label, icon and hover text for `node`. Stale or unrecognized nodes get
/// an "unknown" placeholder instead of an error.
pub fn display_attributes(forest: &Forest, node: &TreeNode) -> DisplayAttributes {
    let attributes = match node {
        TreeNode::Project { id } => forest.find_project_by_id(id).map(|project| {
            let base_url = active_base_url(project);
            DisplayAttributes {
                label: project.name.clone(),
                expand_state: ExpandState::Expanded,
                icon: Some(IconName::Library),
                description: base_url.unwrap_or_default().to_string(),
                tooltip: match base_url {
                    Some(base_url) => format!("current environment: {}", base_url),
                    None => PROJECT_TOOLTIP.to_string(),
                },
                interaction_tag: InteractionTag::Project,
            }
        }),
        TreeNode::Collection { id } => forest.find_collection(id).map(|collection| DisplayAttributes {
            label: collection.name.clone(),
            expand_state: ExpandState::Expanded,
            icon: Some(IconName::Folder),
            description: format!("{} requests", collection.children.len()),
            tooltip: COLLECTION_TOOLTIP.to_string(),
            interaction_tag: InteractionTag::Collection,
        }),
        TreeNode::Interface { id } => forest.find_interface(id).map(|interface| {
            let base_url = forest.find_owning_project(interface).and_then(active_base_url);
            DisplayAttributes {
                label: interface.name.clone(),
                expand_state: ExpandState::Collapsed,
                icon: Some(IconName::Endpoint),
                description: relative_path(&interface.url, base_url),
                tooltip: format!("{} {}", interface.method(), interface.url),
                interaction_tag: InteractionTag::Interface,
            }
        }),
        TreeNode::RequestBody { interface_id } => forest.find_interface(interface_id).map(|interface| {
            body_attributes(
                REQUEST_BODY_LABEL,
                IconName::Edit,
                body_tooltip(interface.request_body.as_deref(), NO_REQUEST_BODY),
                InteractionTag::RequestBody,
            )
        }),
        TreeNode::ResponseBody { interface_id } => forest.find_interface(interface_id).map(|interface| {
            body_attributes(
                RESPONSE_BODY_LABEL,
                IconName::Output,
                body_tooltip(interface.response_body.as_deref(), NO_RESPONSE_BODY),
                InteractionTag::ResponseBody,
            )
        }),
        TreeNode::Unrecognized { .. } => None,
    };

    attributes.unwrap_or_else(|| {
        debug!("Showing placeholder for {:?}", node);
        DisplayAttributes::unknown()
    })
}

/// Interface a body node hangs off, for hosts that open the body on click.
pub fn owning_interface<'a>(forest: &'a Forest, node: &TreeNode) -> Option<&'a Interface> {
    match node {
        TreeNode::RequestBody { interface_id } | TreeNode::ResponseBody { interface_id } => {
            forest.find_interface(interface_id)
        }
        _ => None,
    }
}

fn body_tooltip(body: Option<&str>, placeholder: &str) -> String {
    body.unwrap_or(placeholder).to_string()
}

fn body_attributes(
    label: &str,
    icon: IconName,
    tooltip: String,
    interaction_tag: InteractionTag,
) -> DisplayAttributes {
    DisplayAttributes {
        label: label.to_string(),
        expand_state: ExpandState::None,
        icon: Some(icon),
        description: String::new(),
        tooltip,
        interaction_tag,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Collection, Environment, Project};

    fn interface(id: &str, url: &str, parent_id: &str) -> Interface {
        Interface {
            id: id.to_string(),
            name: format!("{} name", id),
            url: url.to_string(),
            method: None,
            parent_id: parent_id.to_string(),
            request_body: None,
            response_body: None,
        }
    }

    fn forest() -> Forest {
        let mut api = Project::new("p1", "API");
        api.environments = Some(vec![Environment {
            id: "e1".to_string(),
            name: "prod".to_string(),
            base_url: "https://api.example.com/v1".to_string(),
        }]);

        let mut posted = interface("i1", "https://api.example.com/v1/users", "c1");
        posted.method = Some("POST".to_string());
        posted.request_body = Some(r#"{"name":"a"}"#.to_string());

        api.children = vec![
            ProjectChild::Collection(Collection {
                id: "c1".to_string(),
                name: "Users".to_string(),
                parent_id: "p1".to_string(),
                children: vec![posted, interface("i2", "https://api.example.com/v1/users/1", "c1")],
            }),
            ProjectChild::Interface(interface("i3", "https://api.example.com/health", "p1")),
            ProjectChild::Unrecognized(serde_json::Map::new()),
        ];

        let mut bare = Project::new("p2", "Bare");
        bare.children = vec![ProjectChild::Interface(interface("i4", "https://x.io/a/b", "missing"))];

        Forest::new(vec![api, bare])
    }

    #[test]
    fn test_root_children_are_projects_in_order() {
        let forest = forest();
        assert_eq!(
            children(&forest, None),
            vec![
                TreeNode::Project { id: "p1".to_string() },
                TreeNode::Project { id: "p2".to_string() },
            ]
        );
    }

    #[test]
    fn test_project_and_collection_children_keep_order() {
        let forest = forest();
        let project = TreeNode::Project { id: "p1".to_string() };
        assert_eq!(
            children(&forest, Some(&project)),
            vec![
                TreeNode::Collection { id: "c1".to_string() },
                TreeNode::Interface { id: "i3".to_string() },
                TreeNode::Unrecognized { project_id: "p1".to_string(), index: 2 },
            ]
        );

        let collection = TreeNode::Collection { id: "c1".to_string() };
        assert_eq!(
            children(&forest, Some(&collection)),
            vec![
                TreeNode::Interface { id: "i1".to_string() },
                TreeNode::Interface { id: "i2".to_string() },
            ]
        );
    }

    #[test]
    fn test_interface_children_are_two_body_nodes() {
        let forest = forest();
        for id in ["i1", "i2", "i3", "i4"] {
            let node = TreeNode::Interface { id: id.to_string() };
            assert_eq!(
                children(&forest, Some(&node)),
                vec![
                    TreeNode::RequestBody { interface_id: id.to_string() },
                    TreeNode::ResponseBody { interface_id: id.to_string() },
                ]
            );
        }
    }

    #[test]
    fn test_leaves_have_no_children() {
        let forest = forest();
        let leaves = [
            TreeNode::RequestBody { interface_id: "i1".to_string() },
            TreeNode::ResponseBody { interface_id: "i1".to_string() },
            TreeNode::Unrecognized { project_id: "p1".to_string(), index: 2 },
        ];
        for leaf in &leaves {
            assert!(children(&forest, Some(leaf)).is_empty());
        }
    }

    #[test]
    fn test_project_attributes() {
        let forest = forest();
        let attrs = display_attributes(&forest, &TreeNode::Project { id: "p1".to_string() });
        assert_eq!(attrs.label, "API");
        assert_eq!(attrs.expand_state, ExpandState::Expanded);
        assert_eq!(attrs.icon, Some(IconName::Library));
        assert_eq!(attrs.description, "https://api.example.com/v1");
        assert_eq!(attrs.tooltip, "current environment: https://api.example.com/v1");
        assert_eq!(attrs.interaction_tag.as_str(), "project");

        let bare = display_attributes(&forest, &TreeNode::Project { id: "p2".to_string() });
        assert_eq!(bare.description, "");
        assert_eq!(bare.tooltip, PROJECT_TOOLTIP);
    }

    #[test]
    fn test_collection_attributes() {
        let forest = forest();
        let attrs = display_attributes(&forest, &TreeNode::Collection { id: "c1".to_string() });
        assert_eq!(attrs.label, "Users");
        assert_eq!(attrs.icon, Some(IconName::Folder));
        assert_eq!(attrs.description, "2 requests");
        assert_eq!(attrs.interaction_tag, InteractionTag::Collection);
    }

    #[test]
    fn test_interface_attributes_relative_to_environment() {
        let forest = forest();
        let attrs = display_attributes(&forest, &TreeNode::Interface { id: "i1".to_string() });
        assert_eq!(attrs.label, "i1 name");
        assert_eq!(attrs.expand_state, ExpandState::Collapsed);
        assert_eq!(attrs.icon, Some(IconName::Endpoint));
        assert_eq!(attrs.description, "/users");
        assert_eq!(attrs.tooltip, "POST https://api.example.com/v1/users");

        let outside = display_attributes(&forest, &TreeNode::Interface { id: "i3".to_string() });
        assert_eq!(outside.description, "/health");
        assert_eq!(outside.tooltip, "GET https://api.example.com/health");
    }

    #[test]
    fn test_interface_with_dangling_parent_shows_full_path() {
        let forest = forest();
        let attrs = display_attributes(&forest, &TreeNode::Interface { id: "i4".to_string() });
        assert_eq!(attrs.description, "/a/b");
    }

    #[test]
    fn test_body_node_attributes() {
        let forest = forest();
        let request = display_attributes(&forest, &TreeNode::RequestBody { interface_id: "i1".to_string() });
        assert_eq!(request.label, REQUEST_BODY_LABEL);
        assert_eq!(request.expand_state, ExpandState::None);
        assert_eq!(request.icon, Some(IconName::Edit));
        assert_eq!(request.tooltip, r#"{"name":"a"}"#);
        assert_eq!(request.interaction_tag.as_str(), "requestBody");

        let response = display_attributes(&forest, &TreeNode::ResponseBody { interface_id: "i1".to_string() });
        assert_eq!(response.icon, Some(IconName::Output));
        assert_eq!(response.tooltip, NO_RESPONSE_BODY);
        assert_eq!(response.interaction_tag.as_str(), "responseBody");
    }

    #[test]
    fn test_unknown_placeholders() {
        let forest = forest();
        let nodes = [
            TreeNode::Unrecognized { project_id: "p1".to_string(), index: 2 },
            TreeNode::Project { id: "gone".to_string() },
            TreeNode::Interface { id: "gone".to_string() },
            TreeNode::RequestBody { interface_id: "gone".to_string() },
        ];
        for node in &nodes {
            let attrs = display_attributes(&forest, node);
            assert_eq!(attrs.label, UNKNOWN_LABEL);
            assert_eq!(attrs.interaction_tag, InteractionTag::Unknown);
        }
    }

    #[test]
    fn test_presentation_is_idempotent() {
        let forest = forest();
        let node = TreeNode::Interface { id: "i2".to_string() };
        assert_eq!(display_attributes(&forest, &node), display_attributes(&forest, &node));
        assert_eq!(children(&forest, Some(&node)), children(&forest, Some(&node)));
        assert_eq!(children(&forest, None), children(&forest, None));
    }

    #[test]
    fn test_owning_interface_of_body_node() {
        let forest = forest();
        let node = TreeNode::ResponseBody { interface_id: "i2".to_string() };
        assert_eq!(owning_interface(&forest, &node).map(|i| i.id.as_str()), Some("i2"));
        assert!(owning_interface(&forest, &TreeNode::Collection { id: "c1".to_string() }).is_none());
    }
}
