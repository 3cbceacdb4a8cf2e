//! External command description.
//!
//! Commands are kept as an argument vector and never passed through a
//! shell. The `Display` impl renders them the way a user would type them,
//! which is what gets echoed before a command runs.

use std::fmt;
use std::path::{Path, PathBuf};

/// A program plus its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    program: PathBuf,
    args: Vec<String>,
}

impl ToolCommand {
    /// Create a command for `program` with no arguments.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append a single argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn arguments(&self) -> &[String] {
        &self.args
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", shell_quote(&self.program.to_string_lossy()))?;
        for arg in &self.args {
            write!(f, " {}", shell_quote(arg))?;
        }
        Ok(())
    }
}

/// Quote a word for a POSIX shell.
///
/// Words made only of characters a shell never treats specially are
/// returned unchanged; everything else is wrapped in single quotes.
pub fn shell_quote(word: &str) -> String {
    let is_plain = |c: char| c.is_ascii_alphanumeric() || "-_./=:,+@%".contains(c);

    if !word.is_empty() && word.chars().all(is_plain) {
        return word.to_string();
    }

    format!("'{}'", word.replace('\'', r"'\''"))
}
