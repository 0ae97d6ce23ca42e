//! Per-session shell state and the mutations commands request on it.
//!
//! Commands never write to the session or the filesystem directly. They
//! return a list of [`SessionMutation`]s and the engine applies them with
//! [`apply_mutations`], all or nothing.

use std::collections::BTreeMap;
use std::fmt;

use veneer_types::config::AccessLevel;
use veneer_types::error::Result;
use veneer_vfs::{FsNode, ROOT, VirtualFs};

/// Value of a named session flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagValue {
    Bool(bool),
    Text(String),
}

impl FlagValue {
    /// `true` for `Bool(true)` and for non-empty text.
    pub fn is_set(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Text(s) => !s.is_empty(),
        }
    }
}

impl fmt::Display for FlagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Mutable state shared by every command in one terminal session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    cwd: String,
    username: Option<String>,
    access_level: Option<AccessLevel>,
    login_attempts: u32,
    flags: BTreeMap<String, FlagValue>,
}

impl SessionState {
    /// A fresh session at `~`, logged out, with no flags.
    pub fn new() -> Self {
        Self {
            cwd: ROOT.to_string(),
            username: None,
            access_level: None,
            login_attempts: 0,
            flags: BTreeMap::new(),
        }
    }

    /// Canonical current directory.
    pub fn cwd(&self) -> &str {
        &self.cwd
    }

    pub fn is_logged_in(&self) -> bool {
        self.username.is_some()
    }

    /// Name of the logged-in user, if any.
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn access_level(&self) -> Option<AccessLevel> {
        self.access_level
    }

    /// Failed login attempts since the last successful login.
    pub fn login_attempts(&self) -> u32 {
        self.login_attempts
    }

    pub fn flag(&self, name: &str) -> Option<&FlagValue> {
        self.flags.get(name)
    }

    /// Whether the flag exists and is set (see [`FlagValue::is_set`]).
    pub fn flag_is_set(&self, name: &str) -> bool {
        self.flags.get(name).is_some_and(FlagValue::is_set)
    }

    pub fn flags(&self) -> impl Iterator<Item = (&str, &FlagValue)> {
        self.flags.iter().map(|(k, v)| (k.as_str(), v))
    }

    fn apply(&mut self, mutation: SessionMutation, fs: &mut VirtualFs) -> Result<()> {
        match mutation {
            SessionMutation::SetCwd(path) => self.cwd = path,
            SessionMutation::LogIn { username, level } => {
                self.username = Some(username);
                self.access_level = Some(level);
                self.login_attempts = 0;
            },
            SessionMutation::LogOut => {
                self.username = None;
                self.access_level = None;
            },
            SessionMutation::RecordFailedLogin => {
                self.login_attempts = self.login_attempts.saturating_add(1);
            },
            SessionMutation::SetFlag(name, value) => {
                self.flags.insert(name, value);
            },
            SessionMutation::ClearFlag(name) => {
                self.flags.remove(&name);
            },
            SessionMutation::Mount { parent, name, node } => fs.mount(&parent, &name, node)?,
            SessionMutation::Unmount { parent, name } => {
                fs.unmount(&parent, &name)?;
            },
        }
        Ok(())
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

/// A change a command asks the engine to make.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionMutation {
    /// Move to a canonical directory path (already validated by the command).
    SetCwd(String),
    /// Start a login session. Resets the failed-attempt counter.
    LogIn { username: String, level: AccessLevel },
    LogOut,
    RecordFailedLogin,
    SetFlag(String, FlagValue),
    ClearFlag(String),
    /// Graft `node` as child `name` of the directory at `parent`.
    Mount {
        parent: String,
        name: String,
        node: FsNode,
    },
    /// Remove child `name` of the directory at `parent`.
    Unmount { parent: String, name: String },
}

/// Apply `mutations` in order. Either all of them take effect or none do.
pub fn apply_mutations(
    session: &mut SessionState,
    fs: &mut VirtualFs,
    mutations: Vec<SessionMutation>,
) -> Result<()> {
    if mutations.is_empty() {
        return Ok(());
    }
    let mut next_session = session.clone();
    let mut next_fs = fs.clone();
    for mutation in mutations {
        log::debug!("Applying {mutation:?}");
        next_session.apply(mutation, &mut next_fs)?;
    }
    *session = next_session;
    *fs = next_fs;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_defaults() {
        let s = SessionState::new();
        assert_eq!(s.cwd(), "~");
        assert!(!s.is_logged_in());
        assert_eq!(s.access_level(), None);
        assert_eq!(s.login_attempts(), 0);
        assert_eq!(s.flags().count(), 0);
    }

    #[test]
    fn login_sets_level_and_resets_attempts() {
        let mut s = SessionState::new();
        let mut fs = VirtualFs::new();
        apply_mutations(
            &mut s,
            &mut fs,
            vec![
                SessionMutation::RecordFailedLogin,
                SessionMutation::RecordFailedLogin,
            ],
        )
        .unwrap();
        assert_eq!(s.login_attempts(), 2);

        apply_mutations(
            &mut s,
            &mut fs,
            vec![SessionMutation::LogIn {
                username: "alex".into(),
                level: AccessLevel::Admin,
            }],
        )
        .unwrap();
        assert!(s.is_logged_in());
        assert_eq!(s.username(), Some("alex"));
        assert_eq!(s.access_level(), Some(AccessLevel::Admin));
        assert_eq!(s.login_attempts(), 0);

        apply_mutations(&mut s, &mut fs, vec![SessionMutation::LogOut]).unwrap();
        assert!(!s.is_logged_in());
        assert_eq!(s.access_level(), None);
    }

    #[test]
    fn flags_set_and_clear() {
        let mut s = SessionState::new();
        let mut fs = VirtualFs::new();
        apply_mutations(
            &mut s,
            &mut fs,
            vec![
                SessionMutation::SetFlag("portal.connected".into(), FlagValue::Bool(true)),
                SessionMutation::SetFlag("portal.access".into(), FlagValue::Text("staff".into())),
            ],
        )
        .unwrap();
        assert!(s.flag_is_set("portal.connected"));
        assert_eq!(s.flag("portal.access").unwrap().to_string(), "staff");

        apply_mutations(
            &mut s,
            &mut fs,
            vec![SessionMutation::ClearFlag("portal.connected".into())],
        )
        .unwrap();
        assert!(!s.flag_is_set("portal.connected"));
        assert!(!s.flag_is_set("never.set"));
    }

    #[test]
    fn false_and_empty_flags_are_unset() {
        assert!(!FlagValue::Bool(false).is_set());
        assert!(!FlagValue::Text(String::new()).is_set());
        assert!(FlagValue::Text("x".into()).is_set());
    }

    #[test]
    fn failed_mount_rolls_back_everything() {
        let mut s = SessionState::new();
        let mut fs = VirtualFs::new();
        let err = apply_mutations(
            &mut s,
            &mut fs,
            vec![
                SessionMutation::SetFlag("x".into(), FlagValue::Bool(true)),
                SessionMutation::Mount {
                    parent: "~".into(),
                    name: "ok".into(),
                    node: FsNode::dir(),
                },
                SessionMutation::Mount {
                    parent: "~/missing".into(),
                    name: "bad".into(),
                    node: FsNode::dir(),
                },
            ],
        );
        assert!(err.is_err());
        assert!(!s.flag_is_set("x"));
        assert!(!fs.exists("~/ok"));
    }

    #[test]
    fn mount_and_unmount_through_mutations() {
        let mut s = SessionState::new();
        let mut fs = VirtualFs::new();
        apply_mutations(
            &mut s,
            &mut fs,
            vec![SessionMutation::Mount {
                parent: "~".into(),
                name: "share".into(),
                node: FsNode::directory([("a.txt", FsNode::file("a"))]),
            }],
        )
        .unwrap();
        assert!(fs.exists("~/share/a.txt"));
        apply_mutations(
            &mut s,
            &mut fs,
            vec![SessionMutation::Unmount {
                parent: "~".into(),
                name: "share".into(),
            }],
        )
        .unwrap();
        assert!(!fs.exists("~/share"));
    }

    #[test]
    fn set_cwd() {
        let mut s = SessionState::new();
        let mut fs = VirtualFs::new();
        apply_mutations(&mut s, &mut fs, vec![SessionMutation::SetCwd("~/docs".into())]).unwrap();
        assert_eq!(s.cwd(), "~/docs");
    }
}
