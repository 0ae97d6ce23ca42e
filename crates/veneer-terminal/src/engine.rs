//! The interaction engine: one submitted line in, one output batch out.
//!
//! The engine is either idle (the next line is a command) or awaiting input
//! for a [`PendingPrompt`] (the next line is handed, untokenized, to the
//! prompt's continuation). Command results are committed all at once:
//! mutations first, then output, then the next prompt if any.

use veneer_types::config::ShellConfig;
use veneer_types::error::{Result, VeneerError};
use veneer_types::output::{OutputBatch, OutputLine};
use veneer_vfs::VirtualFs;

use crate::commands::register_builtins;
use crate::history::CommandHistory;
use crate::interpreter::{CommandOutcome, CommandRegistry, ShellContext, tokenize};
use crate::prompt::PendingPrompt;
use crate::session::{SessionState, apply_mutations};
use crate::world;

/// A terminal session: state, filesystem, registry and history.
pub struct InteractionEngine {
    registry: CommandRegistry,
    session: SessionState,
    fs: VirtualFs,
    config: ShellConfig,
    history: CommandHistory,
    pending: Option<PendingPrompt>,
}

impl InteractionEngine {
    /// A session over the seed filesystem with every builtin registered.
    pub fn new(config: ShellConfig) -> Result<Self> {
        config.validate()?;
        let fs = VirtualFs::from_root(world::seed_filesystem())?;
        let mut registry = CommandRegistry::new();
        register_builtins(&mut registry);
        Ok(Self::with_parts(config, fs, registry))
    }

    /// A session over an arbitrary filesystem and registry.
    pub fn with_parts(config: ShellConfig, fs: VirtualFs, registry: CommandRegistry) -> Self {
        Self {
            registry,
            session: SessionState::new(),
            fs,
            config,
            history: CommandHistory::new(),
            pending: None,
        }
    }

    /// Process one submitted line and return everything it printed.
    pub fn submit(&mut self, line: &str) -> OutputBatch {
        if self.is_password_mode() {
            self.history.push_secret(line);
        } else {
            self.history.push(line);
        }
        let mut out = OutputBatch::new();

        let (origin, result) = match self.pending.take() {
            Some(prompt) => {
                out.push(OutputLine::input_echo(prompt.echo(line)));
                let origin = prompt.origin().to_string();
                let ctx = self.ctx();
                (origin, prompt.answer(line, &ctx))
            },
            None => {
                out.push(OutputLine::command_echo(format!(
                    "{} $ {line}",
                    self.session.cwd()
                )));
                let tokens = tokenize(line);
                let Some((name, rest)) = tokens.split_first() else {
                    return out;
                };
                let args: Vec<&str> = rest.iter().map(String::as_str).collect();
                log::debug!("Submitting {name} {args:?}");
                let ctx = self.ctx();
                let result = if name.starts_with("./") {
                    match self.registry.resolve_program(name, &ctx) {
                        Ok(program) => program.execute(&args, &ctx),
                        Err(e) => {
                            out.push_error(e.to_string());
                            return out;
                        },
                    }
                } else {
                    self.registry.dispatch(name, &args, &ctx)
                };
                (name.clone(), result)
            },
        };

        match result {
            Ok(outcome) => self.commit(&origin, outcome, &mut out),
            Err(e) => out.push_error(render_error(&origin, &e)),
        }
        out
    }

    fn commit(&mut self, origin: &str, outcome: CommandOutcome, out: &mut OutputBatch) {
        if let Err(e) = apply_mutations(&mut self.session, &mut self.fs, outcome.mutations) {
            log::warn!("{origin}: mutations rejected: {e}");
            out.push_error(render_error(origin, &e));
            return;
        }
        out.append(outcome.output);
        // The whole dialog reports errors under the token that started it.
        self.pending = outcome.prompt.map(|prompt| {
            log::debug!("{origin} awaits input: {:?}", prompt.text());
            prompt.with_origin(origin)
        });
    }

    fn ctx(&self) -> ShellContext<'_> {
        ShellContext {
            session: &self.session,
            fs: &self.fs,
            config: &self.config,
            history: &self.history,
        }
    }

    // -- accessors --

    pub fn cwd(&self) -> &str {
        self.session.cwd()
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn fs(&self) -> &VirtualFs {
        &self.fs
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    pub fn is_awaiting_input(&self) -> bool {
        self.pending.is_some()
    }

    /// Whether the next line should be masked while typed.
    pub fn is_password_mode(&self) -> bool {
        self.pending.as_ref().is_some_and(PendingPrompt::is_password)
    }

    /// Text to show before the input field: the pending question, or
    /// `<cwd> $ ` when idle.
    pub fn prompt(&self) -> String {
        match &self.pending {
            Some(prompt) => prompt.text().to_string(),
            None => format!("{} $ ", self.session.cwd()),
        }
    }

    // -- history and completion --

    /// Recall the previous (older) history entry.
    pub fn history_previous(&mut self) -> &str {
        self.history.previous()
    }

    /// Recall the next (newer) history entry, or the empty line.
    pub fn history_next(&mut self) -> &str {
        self.history.next()
    }

    /// Complete the last word of `line` when exactly one candidate matches.
    ///
    /// The first word completes against command names; later words complete
    /// against entries of the directory they point into (the current
    /// directory for a bare prefix). Hidden entries are offered only when
    /// the prefix starts with `.`. Nothing is completed while a prompt is
    /// pending.
    pub fn complete(&self, line: &str) -> String {
        if self.pending.is_some() {
            return line.to_string();
        }
        let partial = line.rsplit(char::is_whitespace).next().unwrap_or_default();
        let head = &line[..line.len() - partial.len()];
        let candidates = if head.trim().is_empty() {
            self.registry.completions(partial)
        } else {
            self.path_candidates(partial)
        };
        match candidates.as_slice() {
            [only] => format!("{head}{only}"),
            _ => line.to_string(),
        }
    }

    fn path_candidates(&self, partial: &str) -> Vec<String> {
        let (dir_part, prefix) = match partial.rfind('/') {
            Some(i) => partial.split_at(i + 1),
            None => ("", partial),
        };
        let dir = self.ctx().resolve(dir_part);
        let Ok(children) = self.fs.list(&dir) else {
            return Vec::new();
        };
        children
            .into_iter()
            .filter(|(name, node)| {
                name.starts_with(prefix) && (prefix.starts_with('.') || !node.is_hidden())
            })
            .map(|(name, _)| format!("{dir_part}{name}"))
            .collect()
    }
}

/// `<origin>: <error>`, except for unknown commands which name themselves.
fn render_error(origin: &str, err: &VeneerError) -> String {
    match err {
        VeneerError::CommandNotFound(_) => err.to_string(),
        _ => format!("{origin}: {err}"),
    }
}
