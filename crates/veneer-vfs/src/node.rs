//! Filesystem node types.

use std::collections::BTreeMap;
use std::rc::Rc;

/// Child entries of a directory, sorted by name.
pub type Children = BTreeMap<String, Rc<FsNode>>;

/// Discriminant of an [`FsNode`], for callers that only need the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Directory,
    File,
    Executable,
}

/// A node in the virtual tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FsNode {
    Directory {
        children: Children,
        hidden: bool,
    },
    File {
        content: String,
        hidden: bool,
    },
    /// A runnable node. `content` is the banner shown by `cat` and
    /// `--help`; `entry` names the program the shell runs for `./name`.
    Executable {
        content: String,
        hidden: bool,
        entry: String,
    },
}

impl FsNode {
    /// An empty, visible directory.
    pub fn dir() -> Self {
        Self::Directory {
            children: Children::new(),
            hidden: false,
        }
    }

    /// A visible directory holding the given children.
    pub fn directory<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, FsNode)>,
        S: Into<String>,
    {
        Self::Directory {
            children: entries
                .into_iter()
                .map(|(name, node)| (name.into(), Rc::new(node)))
                .collect(),
            hidden: false,
        }
    }

    /// A visible text file.
    pub fn file(content: impl Into<String>) -> Self {
        Self::File {
            content: content.into(),
            hidden: false,
        }
    }

    /// A visible executable bound to the program `entry`.
    pub fn executable(entry: impl Into<String>, content: impl Into<String>) -> Self {
        Self::Executable {
            content: content.into(),
            hidden: false,
            entry: entry.into(),
        }
    }

    /// Mark this node hidden (only listed by `ls -a`).
    pub fn hidden(mut self) -> Self {
        match &mut self {
            Self::Directory { hidden, .. }
            | Self::File { hidden, .. }
            | Self::Executable { hidden, .. } => *hidden = true,
        }
        self
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Directory { .. } => NodeKind::Directory,
            Self::File { .. } => NodeKind::File,
            Self::Executable { .. } => NodeKind::Executable,
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, Self::Directory { .. })
    }

    pub fn is_hidden(&self) -> bool {
        match self {
            Self::Directory { hidden, .. }
            | Self::File { hidden, .. }
            | Self::Executable { hidden, .. } => *hidden,
        }
    }

    /// Children of a directory, `None` for files and executables.
    pub fn children(&self) -> Option<&Children> {
        match self {
            Self::Directory { children, .. } => Some(children),
            Self::File { .. } | Self::Executable { .. } => None,
        }
    }

    /// Text content of a file or the banner of an executable.
    pub fn content(&self) -> Option<&str> {
        match self {
            Self::File { content, .. } | Self::Executable { content, .. } => Some(content),
            Self::Directory { .. } => None,
        }
    }

    /// Listing suffix: `/` for directories, `*` for executables.
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::Directory { .. } => "/",
            Self::Executable { .. } => "*",
            Self::File { .. } => "",
        }
    }
}
