pub mod environment;
pub mod icon;
pub mod prompt;
pub mod tree;

pub use environment::*;
pub use icon::*;
pub use prompt::*;
pub use tree::*;
