//! Shared fixture for command tests.

use veneer_types::config::{AccessLevel, ShellConfig};
use veneer_vfs::{FsNode, VirtualFs};

use crate::history::CommandHistory;
use crate::interpreter::{CommandOutcome, ShellContext};
use crate::session::{SessionMutation, SessionState, apply_mutations};
use crate::world;

/// Owns everything a [`ShellContext`] borrows.
pub struct Fixture {
    pub session: SessionState,
    pub fs: VirtualFs,
    pub config: ShellConfig,
    pub history: CommandHistory,
}

impl Fixture {
    /// A fresh session over the seed filesystem and default config.
    pub fn new() -> Self {
        Self::with_root(world::seed_filesystem())
    }

    pub fn with_root(root: FsNode) -> Self {
        Self {
            session: SessionState::new(),
            fs: VirtualFs::from_root(root).expect("fixture root must be a directory"),
            config: ShellConfig::default(),
            history: CommandHistory::new(),
        }
    }

    pub fn ctx(&self) -> ShellContext<'_> {
        ShellContext {
            session: &self.session,
            fs: &self.fs,
            config: &self.config,
            history: &self.history,
        }
    }

    /// Move to `cwd`, which must be a canonical path.
    pub fn at(mut self, cwd: &str) -> Self {
        self.apply(vec![SessionMutation::SetCwd(cwd.to_string())]);
        self
    }

    pub fn logged_in(mut self, username: &str, level: AccessLevel) -> Self {
        self.apply(vec![SessionMutation::LogIn {
            username: username.to_string(),
            level,
        }]);
        self
    }

    pub fn apply(&mut self, mutations: Vec<SessionMutation>) {
        apply_mutations(&mut self.session, &mut self.fs, mutations).expect("mutations apply");
    }

    /// Apply an outcome's mutations and return its output texts.
    pub fn commit(&mut self, outcome: CommandOutcome) -> Vec<String> {
        let texts = outcome.output.iter().map(|l| l.text.clone()).collect();
        self.apply(outcome.mutations);
        texts
    }
}
