//! Virtual filesystem for the VENEER shell.
//!
//! The tree is a single rooted hierarchy of [`FsNode`] values bound to `~`.
//! Nodes are shared through `Rc`, and the only mutations (`mount` and
//! `unmount`) rebuild the directories between the root and the mutation
//! point. Snapshots taken earlier keep seeing the tree they were taken from.

mod node;
mod path;
mod tree;

pub use node::{Children, FsNode, NodeKind};
pub use path::{ROOT, is_within, join_path, resolve_path};
pub use tree::{VirtualFs, lookup_from};
