//! Command trait, registry, dispatch logic, and the line tokenizer.

use std::collections::HashMap;
use std::rc::Rc;

use veneer_types::config::ShellConfig;
use veneer_types::error::{Result, VeneerError};
use veneer_types::output::OutputBatch;
use veneer_vfs::{FsNode, VirtualFs, resolve_path};

use crate::history::CommandHistory;
use crate::prompt::PendingPrompt;
use crate::session::{SessionMutation, SessionState};

/// Read-only view of the shell handed to every command and continuation.
pub struct ShellContext<'a> {
    pub session: &'a SessionState,
    pub fs: &'a VirtualFs,
    pub config: &'a ShellConfig,
    pub history: &'a CommandHistory,
}

impl ShellContext<'_> {
    /// Resolve a user-typed path against the current directory.
    pub fn resolve(&self, path: &str) -> String {
        resolve_path(path, self.session.cwd())
    }

    /// Resolve and look up a user-typed path.
    ///
    /// Errors name the path as the user typed it, not the canonical form.
    pub fn lookup(&self, arg: &str) -> Result<(String, Rc<FsNode>)> {
        let path = self.resolve(arg);
        match self.fs.lookup(&path) {
            Ok(node) => Ok((path, node)),
            Err(VeneerError::NotADirectory(_)) => Err(VeneerError::NotADirectory(arg.to_string())),
            Err(VeneerError::InvalidPath(_)) => Err(VeneerError::InvalidPath(arg.to_string())),
            Err(_) => Err(VeneerError::NoSuchPath(arg.to_string())),
        }
    }

    /// Name reported for the current user.
    pub fn username(&self) -> &str {
        self.session.username().unwrap_or(&self.config.user)
    }
}

/// What a command produced: output, requested state changes, and possibly a
/// follow-up question.
#[derive(Debug, Default)]
pub struct CommandOutcome {
    pub output: OutputBatch,
    pub mutations: Vec<SessionMutation>,
    pub prompt: Option<PendingPrompt>,
}

impl CommandOutcome {
    /// An outcome with no output, no mutations, and no prompt.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output(output: OutputBatch) -> Self {
        Self {
            output,
            ..Self::default()
        }
    }

    /// A single system line.
    pub fn line(text: impl Into<String>) -> Self {
        Self::with_output(OutputBatch::line(text))
    }

    /// Multi-line text, one system line per `\n` segment.
    pub fn text(text: &str) -> Self {
        Self::with_output(OutputBatch::from_text(text))
    }

    /// Ask a question; the dialog continues in the prompt's continuation.
    pub fn ask(prompt: PendingPrompt) -> Self {
        Self {
            prompt: Some(prompt),
            ..Self::default()
        }
    }

    pub fn mutate(mut self, mutation: SessionMutation) -> Self {
        self.mutations.push(mutation);
        self
    }
}

/// A single executable command.
pub trait Command {
    /// The command name (what the user types).
    fn name(&self) -> &str;

    /// One-line description for `help`.
    fn description(&self) -> &str;

    /// Usage string (e.g. "ls \[-a\] \[path\]").
    fn usage(&self) -> &str;

    /// Command category for grouping in `help` output.
    fn category(&self) -> &str {
        "general"
    }

    /// Execute the command with the given arguments.
    fn execute(&self, args: &[&str], ctx: &ShellContext<'_>) -> Result<CommandOutcome>;
}

/// Commands handled by the registry itself.
const INTERCEPTED: &[(&str, &str)] = &[("help", "general")];

/// Registry of builtin commands and of the programs executable nodes run.
pub struct CommandRegistry {
    commands: HashMap<String, Box<dyn Command>>,
    programs: HashMap<String, Box<dyn Command>>,
}

impl CommandRegistry {
    /// Create an empty command registry.
    pub fn new() -> Self {
        Self {
            commands: HashMap::new(),
            programs: HashMap::new(),
        }
    }

    /// Register a builtin. Replaces any existing command with the same name.
    pub fn register(&mut self, cmd: Box<dyn Command>) {
        self.commands.insert(cmd.name().to_ascii_lowercase(), cmd);
    }

    /// Register a program that executable nodes refer to by `entry`.
    ///
    /// Programs are not reachable by name from the prompt, only through
    /// `./path` on a node whose entry matches.
    pub fn register_program(&mut self, program: Box<dyn Command>) {
        self.programs.insert(program.name().to_string(), program);
    }

    /// Run the builtin `name`. Names are case-insensitive.
    pub fn dispatch(
        &self,
        name: &str,
        args: &[&str],
        ctx: &ShellContext<'_>,
    ) -> Result<CommandOutcome> {
        let name_lower = name.to_ascii_lowercase();
        log::debug!("Dispatching {name_lower} {args:?}");

        if name_lower == "help" {
            return self.execute_help(args);
        }

        match self.commands.get(name_lower.as_str()) {
            Some(cmd) => cmd.execute(args, ctx),
            None => Err(VeneerError::CommandNotFound(name.to_string())),
        }
    }

    /// Find the program behind a `./path` token.
    ///
    /// Fails with `NoSuchPath` if nothing is there and `PermissionDenied`
    /// if the node is not an executable bound to a registered program.
    pub fn resolve_program(&self, token: &str, ctx: &ShellContext<'_>) -> Result<&dyn Command> {
        let (_, node) = ctx.lookup(token)?;
        match &*node {
            FsNode::Executable { entry, .. } => self
                .programs
                .get(entry.as_str())
                .map(|p| p.as_ref())
                .ok_or_else(|| VeneerError::PermissionDenied(token.to_string())),
            FsNode::Directory { .. } | FsNode::File { .. } => {
                Err(VeneerError::PermissionDenied(token.to_string()))
            },
        }
    }

    /// Resolve and run a `./path` executable with `args`.
    pub fn execute_path(
        &self,
        token: &str,
        args: &[&str],
        ctx: &ShellContext<'_>,
    ) -> Result<CommandOutcome> {
        let program = self.resolve_program(token, ctx)?;
        log::debug!("Executing {token} via program {}", program.name());
        program.execute(args, ctx)
    }

    /// Built-in help with access to the registry.
    fn execute_help(&self, args: &[&str]) -> Result<CommandOutcome> {
        if let Some(&name) = args.first() {
            let name_lower = name.to_ascii_lowercase();
            return match self.commands.get(name_lower.as_str()) {
                Some(cmd) => {
                    let mut out = OutputBatch::line(format!("{} ({})", cmd.name(), cmd.category()));
                    out.push_system(format!("  {}", cmd.description()));
                    out.push_system(format!("  usage: {}", cmd.usage()));
                    Ok(CommandOutcome::with_output(out))
                },
                None if name_lower == "help" => Ok(CommandOutcome::line("help [command]")),
                None => Err(VeneerError::CommandNotFound(name.to_string())),
            };
        }

        let mut categories: HashMap<&str, Vec<(&str, &str)>> = HashMap::new();
        for &(name, category) in INTERCEPTED {
            categories
                .entry(category)
                .or_default()
                .push((name, "List commands or show usage"));
        }
        for cmd in self.commands.values() {
            categories
                .entry(cmd.category())
                .or_default()
                .push((cmd.name(), cmd.description()));
        }

        let mut cats: Vec<&str> = categories.keys().copied().collect();
        cats.sort_unstable();

        let total: usize = categories.values().map(Vec::len).sum();
        let mut out = OutputBatch::line(format!("Commands ({total}):"));
        for cat in cats {
            let mut cmds = categories.remove(cat).unwrap_or_default();
            cmds.sort_by_key(|(name, _)| *name);
            out.push_system(format!("  [{cat}]"));
            for (name, desc) in cmds {
                out.push_system(format!("    {name:20} {desc}"));
            }
        }
        out.push_system("Type 'help <command>' for details. Run programs with ./name.");
        Ok(CommandOutcome::with_output(out))
    }

    /// Return a sorted list of (name, description) pairs.
    pub fn list_commands(&self) -> Vec<(&str, &str)> {
        let mut cmds: Vec<(&str, &str)> = self
            .commands
            .values()
            .map(|c| (c.name(), c.description()))
            .collect();
        cmds.sort_by_key(|(name, _)| *name);
        cmds
    }

    /// Command names starting with `partial`, sorted.
    pub fn completions(&self, partial: &str) -> Vec<String> {
        let lower = partial.to_ascii_lowercase();
        let mut names: Vec<String> = self
            .commands
            .keys()
            .map(String::as_str)
            .chain(INTERCEPTED.iter().map(|&(name, _)| name))
            .filter(|name| name.starts_with(&lower))
            .map(str::to_string)
            .collect();
        names.sort_unstable();
        names
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tokenizer: double quotes and backslash escapes.
// ---------------------------------------------------------------------------

/// Split a command line into tokens.
///
/// - Whitespace separates tokens outside double quotes.
/// - A double quote toggles quoted mode; the quote itself is dropped.
/// - A backslash keeps the next character literally, in or out of quotes.
///
/// Never fails: an unterminated quote or a trailing backslash simply ends
/// the last token.
pub fn tokenize(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut chars = input.chars();
    let mut in_quotes = false;

    while let Some(ch) = chars.next() {
        match ch {
            '\\' => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            },
            '"' => in_quotes = !in_quotes,
            c if c.is_whitespace() && !in_quotes => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            },
            c => current.push(c),
        }
    }

    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}
