//! Line tokenizing and command parsing.

use crate::error::{CliError, CliResult};

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `SET <key> <value>`
    Set {
        /// Key to write.
        key: String,
        /// Value to store.
        value: String,
    },
    /// `GET <key>`
    Get {
        /// Key to read.
        key: String,
    },
    /// `DELETE <key>`
    Delete {
        /// Key to remove.
        key: String,
    },
    /// `COUNT <value>`
    Count {
        /// Value to count.
        value: String,
    },
    /// `BEGIN`
    Begin,
    /// `COMMIT`
    Commit,
    /// `ROLLBACK`
    Rollback,
    /// `HELP`
    Help,
    /// `EXIT`
    Exit,
}

impl Command {
    /// Parses one input line.
    ///
    /// The line is split on whitespace and the first token selects the
    /// command, ignoring case. Blank lines and unknown keywords parse to
    /// `None`. Tokens beyond the ones a command needs are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::MissingArgument`] when a known command lacks an
    /// argument.
    pub fn parse(line: &str) -> CliResult<Option<Self>> {
        let mut tokens = line.split_whitespace();
        let Some(keyword) = tokens.next() else {
            return Ok(None);
        };

        let command = match keyword.to_ascii_uppercase().as_str() {
            "SET" => {
                let (key, value) = tokens
                    .next()
                    .zip(tokens.next())
                    .ok_or_else(|| CliError::missing_argument("SET", "<key> <value>"))?;
                Self::Set {
                    key: key.to_owned(),
                    value: value.to_owned(),
                }
            }
            "GET" => Self::Get {
                key: argument(&mut tokens, "GET", "<key>")?,
            },
            "DELETE" => Self::Delete {
                key: argument(&mut tokens, "DELETE", "<key>")?,
            },
            "COUNT" => Self::Count {
                value: argument(&mut tokens, "COUNT", "<value>")?,
            },
            "BEGIN" => Self::Begin,
            "COMMIT" => Self::Commit,
            "ROLLBACK" => Self::Rollback,
            "HELP" => Self::Help,
            "EXIT" => Self::Exit,
            _ => return Ok(None),
        };
        Ok(Some(command))
    }
}

fn argument<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    command: &'static str,
    expected: &'static str,
) -> CliResult<String> {
    tokens
        .next()
        .map(str::to_owned)
        .ok_or_else(|| CliError::missing_argument(command, expected))
}
