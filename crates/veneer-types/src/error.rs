//! Error types for VENEER.

use std::io;

/// Errors produced by the VENEER shell.
///
/// Every variant except the ambient ones (`Config`, `Io`, `TomlParse`) is
/// recoverable inside the shell: the engine turns it into an error line and
/// keeps running.
#[derive(Debug, thiserror::Error)]
pub enum VeneerError {
    #[error("{0}: No such file or directory")]
    NoSuchPath(String),

    #[error("{0}: Not a directory")]
    NotADirectory(String),

    #[error("{0}: Is a directory")]
    IsADirectory(String),

    #[error("{0}: Permission denied")]
    PermissionDenied(String),

    #[error("missing operand")]
    MissingOperand,

    #[error("usage: {0}")]
    MissingArgs(String),

    #[error("invalid option -- '{0}'")]
    InvalidOption(String),

    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("{0}: command not found")]
    CommandNotFound(String),

    #[error("already connected to {0}")]
    AlreadyConnected(String),

    #[error("not logged in")]
    NotLoggedIn,

    #[error("not connected to {0}")]
    NotConnected(String),

    #[error("authentication failed for {0}")]
    AuthenticationFailed(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, VeneerError>;
