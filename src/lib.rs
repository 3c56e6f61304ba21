//! Request manager core: projects hold collections and interfaces, and each
//! project can switch between named base URLs that interface paths are
//! shown relative to.

pub mod config;
pub mod error;
pub mod navigator;
pub mod storage;
pub mod types;
pub mod ui;
pub mod url_path;
pub mod workspace;

pub use error::{Result, WorkspaceError};
pub use types::{Collection, Environment, Forest, Interface, Project, ProjectChild};
pub use workspace::{ChangeNotifier, Workspace};
