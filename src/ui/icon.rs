use std::fmt;

/// Icons the host shell can draw next to a tree node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IconName {
    Library,
    Folder,
    Endpoint,
    Edit,
    Output,
}

impl IconName {
    /// Identifier of the icon in the host's icon set
    pub fn id(&self) -> &'static str {
        match self {
            IconName::Library => "library",
            IconName::Folder => "folder",
            IconName::Endpoint => "endpoint",
            IconName::Edit => "edit",
            IconName::Output => "output",
        }
    }
}

impl fmt::Display for IconName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}
