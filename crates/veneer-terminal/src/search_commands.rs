//! Search commands: find, grep.

use veneer_types::error::{Result, VeneerError};
use veneer_types::output::{OutputBatch, OutputLine};
use veneer_vfs::FsNode;

use crate::interpreter::{Command, CommandOutcome, CommandRegistry, ShellContext};

/// Register search commands.
pub fn register_search_commands(reg: &mut CommandRegistry) {
    reg.register(Box::new(FindCmd));
    reg.register(Box::new(GrepCmd));
}

// ---------------------------------------------------------------------------
// find
// ---------------------------------------------------------------------------

struct FindCmd;
impl Command for FindCmd {
    fn name(&self) -> &str {
        "find"
    }
    fn description(&self) -> &str {
        "Search names and file contents"
    }
    fn usage(&self) -> &str {
        "find <pattern>"
    }
    fn category(&self) -> &str {
        "search"
    }
    fn execute(&self, args: &[&str], ctx: &ShellContext<'_>) -> Result<CommandOutcome> {
        let Some(&pattern) = args.first() else {
            return Err(VeneerError::MissingOperand);
        };
        let needle = pattern.to_lowercase();

        let mut by_name = Vec::new();
        let mut by_content = Vec::new();
        for (path, node) in ctx.fs.descendants(false) {
            let name = path.rsplit('/').next().unwrap_or(&path);
            if name.to_lowercase().contains(&needle) {
                by_name.push(format!("{path}{}", if node.is_dir() { "/" } else { "" }));
            } else if let FsNode::File { content, .. } = &*node
                && content.to_lowercase().contains(&needle)
            {
                by_content.push(format!("{path} (matches content)"));
            }
        }

        if by_name.is_empty() && by_content.is_empty() {
            return Ok(CommandOutcome::line(format!("no matches for '{pattern}'")));
        }
        Ok(CommandOutcome::with_output(
            by_name
                .into_iter()
                .chain(by_content)
                .map(OutputLine::system)
                .collect(),
        ))
    }
}

// ---------------------------------------------------------------------------
// grep
// ---------------------------------------------------------------------------

struct GrepCmd;
impl Command for GrepCmd {
    fn name(&self) -> &str {
        "grep"
    }
    fn description(&self) -> &str {
        "Print lines of a file containing a pattern"
    }
    fn usage(&self) -> &str {
        "grep [-n] <pattern> <file>"
    }
    fn category(&self) -> &str {
        "search"
    }
    fn execute(&self, args: &[&str], ctx: &ShellContext<'_>) -> Result<CommandOutcome> {
        let mut show_numbers = false;
        let mut positional = Vec::new();
        for &arg in args {
            match arg {
                "-n" => show_numbers = true,
                flag if flag.len() > 1 && flag.starts_with('-') => {
                    return Err(VeneerError::InvalidOption(flag.to_string()));
                },
                _ => positional.push(arg),
            }
        }
        let [pattern, file, ..] = positional[..] else {
            return Err(VeneerError::MissingArgs(self.usage().to_string()));
        };

        let (_, node) = ctx.lookup(file)?;
        let Some(text) = node.content() else {
            return Err(VeneerError::IsADirectory(file.to_string()));
        };

        let needle = pattern.to_lowercase();
        let mut out = OutputBatch::new();
        for (i, line) in text.split('\n').enumerate() {
            if line.to_lowercase().contains(&needle) {
                if show_numbers {
                    out.push_system(format!("{}:{line}", i + 1));
                } else {
                    out.push_system(line);
                }
            }
        }
        Ok(CommandOutcome::with_output(out))
    }
}
