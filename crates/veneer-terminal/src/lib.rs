//! Command interpreter and interaction engine for the VENEER terminal.
//!
//! The terminal is a registry-based dispatch system. Commands implement the
//! `Command` trait and are registered by name; executable filesystem nodes
//! name a registered program. Commands read a `ShellContext` and return a
//! `CommandOutcome` holding output, requested mutations, and optionally a
//! `PendingPrompt` that receives the next submitted line.

pub mod auth_commands;
mod commands;
mod engine;
mod history;
mod interpreter;
pub mod network_commands;
mod prompt;
pub mod search_commands;
mod session;
pub mod world;

#[cfg(test)]
mod test_utils;

/// Register all built-in commands and programs into a registry.
pub use commands::register_builtins;
/// Line-in, batch-out driver for one terminal session.
pub use engine::InteractionEngine;
/// Submitted lines with a recall cursor.
pub use history::CommandHistory;
/// A single executable command trait.
pub use interpreter::Command;
/// What a command produced.
pub use interpreter::CommandOutcome;
/// Registry of available commands and programs with dispatch.
pub use interpreter::CommandRegistry;
/// Read-only view of the shell passed to every command.
pub use interpreter::ShellContext;
/// Split a command line into tokens.
pub use interpreter::tokenize;
/// A question waiting for the next submitted line.
pub use prompt::PendingPrompt;
pub use session::{FlagValue, SessionMutation, SessionState, apply_mutations};
