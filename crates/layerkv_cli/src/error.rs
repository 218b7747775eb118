//! Error types for the command line.

use rustyline::error::ReadlineError;
use std::io;
use thiserror::Error;

/// Result type for command line operations.
pub type CliResult<T> = Result<T, CliError>;

/// Errors raised while reading, parsing or answering commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Reading input or writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A command was given fewer arguments than it needs.
    #[error("{command} expects {expected}")]
    MissingArgument {
        /// The command keyword.
        command: &'static str,
        /// Usage of the missing arguments.
        expected: &'static str,
    },

    /// The terminal line editor failed.
    #[error("line editor error: {0}")]
    Readline(#[from] ReadlineError),

    /// The stats report could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CliError {
    /// Creates a missing argument error.
    pub fn missing_argument(command: &'static str, expected: &'static str) -> Self {
        Self::MissingArgument { command, expected }
    }

    /// Checks if this error is a user input mistake rather than a fault.
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::MissingArgument { .. })
    }
}
