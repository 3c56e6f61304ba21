use anyhow::Context;
use clap::{Parser, Subcommand};
use reqtree::Workspace;
use reqtree::config::AppConfig;
use reqtree::navigator::active_environment;
use reqtree::storage::{KeyValueStore, StorageManager};
use reqtree::ui::{EnvironmentOutcome, TerminalPrompt, TreeNode};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "reqtree")]
#[command(about = "Browse saved API projects and switch their environments", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the project tree
    Tree,

    /// Environment management
    #[command(subcommand)]
    Env(EnvCommands),
}

#[derive(Subcommand)]
enum EnvCommands {
    /// Add an environment to a project
    Add {
        /// Project id
        project: String,
    },
    /// Pick the current environment of a project
    Use {
        /// Project id
        project: String,
    },
    /// List the environments of a project
    List {
        /// Project id
        project: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config).context("Failed to load configuration")?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_level.as_str()),
    )
    .init();

    let manager = StorageManager::new(config.storage.clone())
        .await
        .context("Failed to open storage")?;
    let store: Arc<dyn KeyValueStore> = Arc::from(manager.into_storage());
    let mut workspace = Workspace::load(store, config.storage.store_key.clone(), Arc::new(TerminalPrompt::new()))
        .await
        .context("Failed to load projects")?;

    match cli.command {
        Commands::Tree => print_tree(&workspace),
        Commands::Env(cmd) => handle_env_command(cmd, &mut workspace).await?,
    }

    Ok(())
}

async fn handle_env_command(cmd: EnvCommands, workspace: &mut Workspace) -> anyhow::Result<()> {
    match cmd {
        EnvCommands::Add { project } => {
            match workspace.add_environment(&project).await? {
                EnvironmentOutcome::Added { environment_id } => {
                    println!("✓ Added environment {}", environment_id);
                }
                _ => println!("Cancelled"),
            }
        }
        EnvCommands::Use { project } => {
            match workspace.set_current_environment(&project).await? {
                EnvironmentOutcome::Selected { environment_id } => {
                    println!("✓ Switched to environment {}", environment_id);
                }
                EnvironmentOutcome::NoEnvironments => {}
                _ => println!("Cancelled"),
            }
        }
        EnvCommands::List { project: project_id } => {
            let project = workspace
                .forest()
                .find_project_by_id(&project_id)
                .with_context(|| format!("Project not found: {}", project_id))?;

            if project.environments().is_empty() {
                println!("No environments found");
                return Ok(());
            }

            let active_id = active_environment(project).map(|env| env.id.as_str());
            println!("Environments of {}:", project.name);
            for env in project.environments() {
                let marker = if Some(env.id.as_str()) == active_id { "*" } else { " " };
                println!("  {} {}  {}  ({})", marker, env.name, env.base_url, env.id);
            }
        }
    }

    Ok(())
}

fn print_tree(workspace: &Workspace) {
    for root in workspace.children(None) {
        print_node(workspace, &root, 0);
    }
}

fn print_node(workspace: &Workspace, node: &TreeNode, depth: usize) {
    let attrs = workspace.display_attributes(node);
    let indent = "  ".repeat(depth);

    if attrs.description.is_empty() {
        println!("{}{} [{}]", indent, attrs.label, attrs.interaction_tag.as_str());
    } else {
        println!(
            "{}{}  {} [{}]",
            indent,
            attrs.label,
            attrs.description,
            attrs.interaction_tag.as_str()
        );
    }

    for child in workspace.children(Some(node)) {
        print_node(workspace, &child, depth + 1);
    }
}
