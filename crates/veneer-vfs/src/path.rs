//! Path resolution for the single `~`-rooted tree.

/// Name of the root directory.
pub const ROOT: &str = "~";

/// Resolve a user-typed path against `cwd` into a canonical path.
///
/// `~` and `/` both name the root. A leading `~/` or `/` starts the walk at
/// the root, anything else starts at `cwd`. `..` never climbs above `~`.
/// The result is a `/`-joined list of segments starting with `~`, with no
/// `.`, `..`, or empty segments left.
pub fn resolve_path(path: &str, cwd: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed == ROOT || (trimmed.is_empty() && path.starts_with('/')) {
        return ROOT.to_string();
    }

    let (mut parts, rest): (Vec<&str>, &str) = if let Some(rest) = trimmed.strip_prefix("~/") {
        (vec![ROOT], rest)
    } else if let Some(rest) = trimmed.strip_prefix('/') {
        (vec![ROOT], rest)
    } else {
        let mut base: Vec<&str> = cwd.split('/').filter(|s| !s.is_empty()).collect();
        if base.first() != Some(&ROOT) {
            base.insert(0, ROOT);
        }
        (base, trimmed)
    };

    for segment in rest.split('/') {
        match segment {
            "" | "." => {},
            ".." => {
                if parts.len() > 1 {
                    parts.pop();
                }
            },
            other => parts.push(other),
        }
    }

    parts.join("/")
}

/// Join a canonical directory path and a child name.
pub fn join_path(parent: &str, name: &str) -> String {
    format!("{}/{name}", parent.trim_end_matches('/'))
}

/// Whether canonical `path` is `ancestor` itself or lies beneath it.
pub fn is_within(path: &str, ancestor: &str) -> bool {
    path == ancestor
        || path
            .strip_prefix(ancestor)
            .is_some_and(|rest| rest.starts_with('/'))
}
