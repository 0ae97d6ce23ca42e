//! Built-in commands for the VENEER terminal.

use veneer_types::error::{Result, VeneerError};
use veneer_types::output::{OutputBatch, OutputLine};
use veneer_vfs::ROOT;

use crate::interpreter::{Command, CommandOutcome, CommandRegistry, ShellContext};
use crate::session::SessionMutation;

/// Register all built-in commands and programs into a registry.
pub fn register_builtins(reg: &mut CommandRegistry) {
    reg.register(Box::new(LsCmd));
    reg.register(Box::new(CdCmd));
    reg.register(Box::new(PwdCmd));
    reg.register(Box::new(CatCmd));
    reg.register(Box::new(EchoCmd));
    reg.register(Box::new(WhoamiCmd));
    reg.register(Box::new(HistoryCmd));
    crate::search_commands::register_search_commands(reg);
    crate::auth_commands::register_auth_commands(reg);
    crate::network_commands::register_network_commands(reg);
}

// ---------------------------------------------------------------------------
// ls
// ---------------------------------------------------------------------------

struct LsCmd;
impl Command for LsCmd {
    fn name(&self) -> &str {
        "ls"
    }
    fn description(&self) -> &str {
        "List directory contents"
    }
    fn usage(&self) -> &str {
        "ls [-a|--all] [path]"
    }
    fn category(&self) -> &str {
        "filesystem"
    }
    fn execute(&self, args: &[&str], ctx: &ShellContext<'_>) -> Result<CommandOutcome> {
        let mut show_all = false;
        let mut target = None;
        for &arg in args {
            match arg {
                "-a" | "--all" => show_all = true,
                flag if flag.len() > 1 && flag.starts_with('-') => {
                    return Err(VeneerError::InvalidOption(flag.to_string()));
                },
                path => {
                    target.get_or_insert(path);
                },
            }
        }

        let shown = target.unwrap_or(".");
        let (_, node) = ctx.lookup(shown)?;
        let Some(children) = node.children() else {
            return Err(VeneerError::NotADirectory(shown.to_string()));
        };

        let output = children
            .iter()
            .filter(|(_, child)| show_all || !child.is_hidden())
            .map(|(name, child)| format!("{name}{}", child.suffix()))
            .map(OutputLine::system)
            .collect();
        Ok(CommandOutcome::with_output(output))
    }
}

// ---------------------------------------------------------------------------
// cd
// ---------------------------------------------------------------------------

struct CdCmd;
impl Command for CdCmd {
    fn name(&self) -> &str {
        "cd"
    }
    fn description(&self) -> &str {
        "Change working directory"
    }
    fn usage(&self) -> &str {
        "cd [path]"
    }
    fn category(&self) -> &str {
        "filesystem"
    }
    fn execute(&self, args: &[&str], ctx: &ShellContext<'_>) -> Result<CommandOutcome> {
        let Some(&arg) = args.first() else {
            return Ok(CommandOutcome::new().mutate(SessionMutation::SetCwd(ROOT.to_string())));
        };
        let (path, node) = ctx.lookup(arg)?;
        if !node.is_dir() {
            return Err(VeneerError::NotADirectory(arg.to_string()));
        }
        Ok(CommandOutcome::new().mutate(SessionMutation::SetCwd(path)))
    }
}

// ---------------------------------------------------------------------------
// pwd
// ---------------------------------------------------------------------------

struct PwdCmd;
impl Command for PwdCmd {
    fn name(&self) -> &str {
        "pwd"
    }
    fn description(&self) -> &str {
        "Print working directory"
    }
    fn usage(&self) -> &str {
        "pwd"
    }
    fn category(&self) -> &str {
        "filesystem"
    }
    fn execute(&self, _args: &[&str], ctx: &ShellContext<'_>) -> Result<CommandOutcome> {
        Ok(CommandOutcome::line(ctx.session.cwd()))
    }
}

// ---------------------------------------------------------------------------
// cat
// ---------------------------------------------------------------------------

struct CatCmd;
impl Command for CatCmd {
    fn name(&self) -> &str {
        "cat"
    }
    fn description(&self) -> &str {
        "Display file contents"
    }
    fn usage(&self) -> &str {
        "cat <file...>"
    }
    fn category(&self) -> &str {
        "filesystem"
    }
    fn execute(&self, args: &[&str], ctx: &ShellContext<'_>) -> Result<CommandOutcome> {
        if args.is_empty() {
            return Err(VeneerError::MissingOperand);
        }
        let mut output = OutputBatch::new();
        for &arg in args {
            let (_, node) = ctx.lookup(arg)?;
            match node.content() {
                Some(content) => output.append(OutputBatch::from_text(content)),
                None => return Err(VeneerError::IsADirectory(arg.to_string())),
            }
        }
        Ok(CommandOutcome::with_output(output))
    }
}

// ---------------------------------------------------------------------------
// echo
// ---------------------------------------------------------------------------

struct EchoCmd;
impl Command for EchoCmd {
    fn name(&self) -> &str {
        "echo"
    }
    fn description(&self) -> &str {
        "Print text"
    }
    fn usage(&self) -> &str {
        "echo [text...]"
    }
    fn execute(&self, args: &[&str], _ctx: &ShellContext<'_>) -> Result<CommandOutcome> {
        Ok(CommandOutcome::line(args.join(" ")))
    }
}

// ---------------------------------------------------------------------------
// whoami
// ---------------------------------------------------------------------------

struct WhoamiCmd;
impl Command for WhoamiCmd {
    fn name(&self) -> &str {
        "whoami"
    }
    fn description(&self) -> &str {
        "Show the current user"
    }
    fn usage(&self) -> &str {
        "whoami"
    }
    fn category(&self) -> &str {
        "security"
    }
    fn execute(&self, _args: &[&str], ctx: &ShellContext<'_>) -> Result<CommandOutcome> {
        let mut output = OutputBatch::line(format!("user: {}", ctx.username()));
        if let Some(level) = ctx.session.access_level() {
            output.push_system(format!("access level: {level}"));
        }
        Ok(CommandOutcome::with_output(output))
    }
}

// ---------------------------------------------------------------------------
// history
// ---------------------------------------------------------------------------

struct HistoryCmd;
impl Command for HistoryCmd {
    fn name(&self) -> &str {
        "history"
    }
    fn description(&self) -> &str {
        "Show submitted lines"
    }
    fn usage(&self) -> &str {
        "history"
    }
    fn execute(&self, _args: &[&str], ctx: &ShellContext<'_>) -> Result<CommandOutcome> {
        if ctx.history.is_empty() {
            return Ok(CommandOutcome::line("(no history)"));
        }
        let output = ctx
            .history
            .display_entries()
            .enumerate()
            .map(|(i, entry)| format!("  {:4}  {entry}", i + 1))
            .map(OutputLine::system)
            .collect();
        Ok(CommandOutcome::with_output(output))
    }
}
