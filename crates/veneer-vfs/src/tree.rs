//! The virtual filesystem tree and its copy-on-write mutations.

use std::rc::Rc;

use veneer_types::error::{Result, VeneerError};

use crate::node::{Children, FsNode};
use crate::path::{ROOT, join_path};

/// The simulated filesystem.
///
/// Owns the root directory exclusively. Lookups hand out shared `Rc`
/// references; mutations never touch a node that someone else may hold.
#[derive(Debug, Clone)]
pub struct VirtualFs {
    root: Rc<FsNode>,
}

impl VirtualFs {
    /// A filesystem holding only an empty root.
    pub fn new() -> Self {
        Self {
            root: Rc::new(FsNode::dir()),
        }
    }

    /// Wrap an existing tree. The root must be a directory.
    pub fn from_root(root: FsNode) -> Result<Self> {
        if !root.is_dir() {
            return Err(VeneerError::NotADirectory(ROOT.to_string()));
        }
        Ok(Self {
            root: Rc::new(root),
        })
    }

    /// A handle to the current root. It keeps resolving to the current
    /// contents even after later mounts replace them in `self`.
    pub fn snapshot(&self) -> Rc<FsNode> {
        Rc::clone(&self.root)
    }

    /// Find the node at a canonical path.
    pub fn lookup(&self, path: &str) -> Result<Rc<FsNode>> {
        lookup_from(&self.root, path)
    }

    /// Whether a node exists at `path`.
    pub fn exists(&self, path: &str) -> bool {
        self.lookup(path).is_ok()
    }

    /// Children of the directory at `path`, in name order.
    pub fn list(&self, path: &str) -> Result<Vec<(String, Rc<FsNode>)>> {
        let node = self.lookup(path)?;
        match node.children() {
            Some(children) => Ok(children
                .iter()
                .map(|(name, child)| (name.clone(), Rc::clone(child)))
                .collect()),
            None => Err(VeneerError::NotADirectory(path.to_string())),
        }
    }

    /// Insert or replace the child `name` of the directory at `parent`.
    ///
    /// Every directory from the root down to `parent` is copied; siblings are
    /// shared with the previous tree.
    pub fn mount(&mut self, parent: &str, name: &str, node: FsNode) -> Result<()> {
        check_name(name)?;
        let segments = segments(parent)?;
        let new_root = rebuild(&self.root, &segments, parent, |children| {
            children.insert(name.to_string(), Rc::new(node));
            Ok(())
        })?
        .0;
        self.root = Rc::new(new_root);
        log::info!("Mounted {}", join_path(parent, name));
        Ok(())
    }

    /// Remove the child `name` of the directory at `parent`, returning it.
    pub fn unmount(&mut self, parent: &str, name: &str) -> Result<Rc<FsNode>> {
        let segments = segments(parent)?;
        let (new_root, removed) = rebuild(&self.root, &segments, parent, |children| {
            children
                .remove(name)
                .ok_or_else(|| VeneerError::NoSuchPath(join_path(parent, name)))
        })?;
        self.root = Rc::new(new_root);
        log::info!("Unmounted {}", join_path(parent, name));
        Ok(removed)
    }

    /// Depth-first list of every node below the root, in name order.
    ///
    /// Hidden nodes (and everything under them) are skipped unless
    /// `include_hidden` is set.
    pub fn descendants(&self, include_hidden: bool) -> Vec<(String, Rc<FsNode>)> {
        let mut out = Vec::new();
        collect(&self.root, ROOT, include_hidden, &mut out);
        out
    }
}

impl Default for VirtualFs {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve a canonical path against an arbitrary root, such as a snapshot.
pub fn lookup_from(root: &Rc<FsNode>, path: &str) -> Result<Rc<FsNode>> {
    let mut node = Rc::clone(root);
    for segment in segments(path)? {
        let next = match node.children() {
            Some(children) => children
                .get(segment)
                .map(Rc::clone)
                .ok_or_else(|| VeneerError::NoSuchPath(path.to_string()))?,
            None => return Err(VeneerError::NotADirectory(path.to_string())),
        };
        node = next;
    }
    Ok(node)
}

/// Segments below the root. Paths must start at `~` (or be empty).
fn segments(path: &str) -> Result<Vec<&str>> {
    let mut parts = path.split('/').filter(|s| !s.is_empty());
    match parts.next() {
        None => Ok(Vec::new()),
        Some(ROOT) => Ok(parts.collect()),
        Some(_) => Err(VeneerError::InvalidPath(path.to_string())),
    }
}

fn check_name(name: &str) -> Result<()> {
    if name.is_empty() || name.contains('/') || matches!(name, "." | ".." | ROOT) {
        return Err(VeneerError::InvalidPath(name.to_string()));
    }
    Ok(())
}

/// Copy the directory chain from `node` along `segments`, apply `edit` to the
/// children of the last directory, and return the new top node.
fn rebuild<T>(
    node: &FsNode,
    segments: &[&str],
    path: &str,
    edit: impl FnOnce(&mut Children) -> Result<T>,
) -> Result<(FsNode, T)> {
    let FsNode::Directory { children, hidden } = node else {
        return Err(VeneerError::NotADirectory(path.to_string()));
    };
    let mut children = children.clone();
    let out = match segments.split_first() {
        None => edit(&mut children)?,
        Some((first, rest)) => {
            let child = children
                .get(*first)
                .ok_or_else(|| VeneerError::NoSuchPath(path.to_string()))?;
            let (new_child, out) = rebuild(child, rest, path, edit)?;
            children.insert((*first).to_string(), Rc::new(new_child));
            out
        },
    };
    Ok((
        FsNode::Directory {
            children,
            hidden: *hidden,
        },
        out,
    ))
}

fn collect(node: &FsNode, path: &str, include_hidden: bool, out: &mut Vec<(String, Rc<FsNode>)>) {
    let Some(children) = node.children() else {
        return;
    };
    for (name, child) in children {
        if child.is_hidden() && !include_hidden {
            continue;
        }
        let child_path = join_path(path, name);
        out.push((child_path.clone(), Rc::clone(child)));
        collect(child, &child_path, include_hidden, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> VirtualFs {
        VirtualFs::from_root(FsNode::directory([
            (
                "docs",
                FsNode::directory([
                    ("notes.txt", FsNode::file("line one\nline two")),
                    (".secret", FsNode::file("psst").hidden()),
                ]),
            ),
            ("bin", FsNode::directory([("tool", FsNode::executable("tool", "banner"))])),
            ("readme.txt", FsNode::file("hello")),
        ]))
        .unwrap()
    }

    #[test]
    fn lookup_root_forms() {
        let fs = sample();
        assert!(fs.lookup("~").unwrap().is_dir());
        assert!(fs.lookup("").unwrap().is_dir());
        assert!(fs.lookup("~/").unwrap().is_dir());
    }

    #[test]
    fn lookup_nested_file() {
        let fs = sample();
        let node = fs.lookup("~/docs/notes.txt").unwrap();
        assert_eq!(node.content(), Some("line one\nline two"));
    }

    #[test]
    fn lookup_missing_is_no_such_path() {
        let fs = sample();
        assert!(matches!(
            fs.lookup("~/docs/nope"),
            Err(VeneerError::NoSuchPath(_))
        ));
    }

    #[test]
    fn lookup_through_file_is_not_a_directory() {
        let fs = sample();
        assert!(matches!(
            fs.lookup("~/readme.txt/x"),
            Err(VeneerError::NotADirectory(_))
        ));
    }

    #[test]
    fn lookup_foreign_root_is_invalid() {
        let fs = sample();
        assert!(matches!(
            fs.lookup("etc/passwd"),
            Err(VeneerError::InvalidPath(_))
        ));
    }

    #[test]
    fn from_root_rejects_files() {
        assert!(VirtualFs::from_root(FsNode::file("x")).is_err());
    }

    #[test]
    fn list_is_sorted_and_includes_hidden() {
        let fs = sample();
        let names: Vec<_> = fs.list("~/docs").unwrap().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec![".secret", "notes.txt"]);
    }

    #[test]
    fn list_file_is_not_a_directory() {
        let fs = sample();
        assert!(matches!(
            fs.list("~/readme.txt"),
            Err(VeneerError::NotADirectory(_))
        ));
    }

    #[test]
    fn mount_then_lookup_round_trip() {
        let mut fs = sample();
        let node = FsNode::directory([("memo.txt", FsNode::file("quarterly"))]);
        fs.mount("~/docs", "archive", node.clone()).unwrap();
        assert_eq!(*fs.lookup("~/docs/archive").unwrap(), node);
    }

    #[test]
    fn snapshot_is_isolated_from_mount() {
        let mut fs = sample();
        let before = fs.snapshot();
        fs.mount("~/docs", "notes.txt", FsNode::file("rewritten")).unwrap();
        fs.mount("~", "new", FsNode::dir()).unwrap();

        let old = lookup_from(&before, "~/docs/notes.txt").unwrap();
        assert_eq!(old.content(), Some("line one\nline two"));
        assert!(lookup_from(&before, "~/new").is_err());

        assert_eq!(fs.lookup("~/docs/notes.txt").unwrap().content(), Some("rewritten"));
        assert!(fs.exists("~/new"));
    }

    #[test]
    fn mount_shares_untouched_siblings() {
        let mut fs = sample();
        let bin_before = fs.lookup("~/bin").unwrap();
        fs.mount("~/docs", "extra", FsNode::file("x")).unwrap();
        let bin_after = fs.lookup("~/bin").unwrap();
        assert!(Rc::ptr_eq(&bin_before, &bin_after));
    }

    #[test]
    fn mount_preserves_hidden_flag_on_copied_dirs() {
        let mut fs =
            VirtualFs::from_root(FsNode::directory([(".vault", FsNode::dir().hidden())])).unwrap();
        fs.mount("~/.vault", "key", FsNode::file("k")).unwrap();
        assert!(fs.lookup("~/.vault").unwrap().is_hidden());
    }

    #[test]
    fn mount_into_missing_parent_fails_without_change() {
        let mut fs = sample();
        let before = fs.snapshot();
        assert!(matches!(
            fs.mount("~/nowhere", "x", FsNode::dir()),
            Err(VeneerError::NoSuchPath(_))
        ));
        assert!(Rc::ptr_eq(&before, &fs.snapshot()));
    }

    #[test]
    fn mount_into_file_fails() {
        let mut fs = sample();
        assert!(matches!(
            fs.mount("~/readme.txt", "x", FsNode::dir()),
            Err(VeneerError::NotADirectory(_))
        ));
    }

    #[test]
    fn mount_rejects_bad_names() {
        let mut fs = sample();
        for bad in ["", "a/b", ".", "..", "~"] {
            assert!(fs.mount("~", bad, FsNode::dir()).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn unmount_removes_and_returns_node() {
        let mut fs = sample();
        let before = fs.snapshot();
        let removed = fs.unmount("~", "bin").unwrap();
        assert!(removed.is_dir());
        assert!(!fs.exists("~/bin"));
        assert!(lookup_from(&before, "~/bin/tool").is_ok());
    }

    #[test]
    fn unmount_missing_child_fails() {
        let mut fs = sample();
        assert!(matches!(
            fs.unmount("~", "ghost"),
            Err(VeneerError::NoSuchPath(p)) if p == "~/ghost"
        ));
    }

    #[test]
    fn descendants_skip_hidden_subtrees() {
        let fs = sample();
        let visible: Vec<_> = fs.descendants(false).into_iter().map(|(p, _)| p).collect();
        assert_eq!(
            visible,
            vec!["~/bin", "~/bin/tool", "~/docs", "~/docs/notes.txt", "~/readme.txt"]
        );
        let all = fs.descendants(true);
        assert!(all.iter().any(|(p, _)| p == "~/docs/.secret"));
    }
}
