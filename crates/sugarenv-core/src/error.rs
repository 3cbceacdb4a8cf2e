//! Error types for environment setup.
//!
//! Every failure is fatal for the run. The variants carry enough context
//! for the CLI to print a useful message and pick an exit code.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while setting up the toolchain environment.
#[derive(Debug, Error)]
pub enum SetupError {
    // === External commands ===
    /// An external command ran and reported failure.
    #[error("command `{command}` failed ({})", describe_exit(.code))]
    CommandFailed { command: String, code: Option<i32> },

    /// An external command could not be started at all.
    #[error("failed to launch `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Captured output was not valid UTF-8.
    #[error("`{command}` produced output that is not valid UTF-8")]
    InvalidUtf8 { command: String },

    /// A command whose output we need printed nothing.
    #[error("`{command}` produced no output")]
    EmptyOutput { command: String },

    /// The conda executable could not be located.
    #[error("conda executable not found: {0}")]
    CondaNotFound(String),

    // === Inputs ===
    /// `conda env list --json` returned something we could not read.
    #[error("could not parse conda environment listing: {0}")]
    EnvList(#[from] serde_json::Error),

    /// The environment file used for create/update does not exist.
    #[error("environment file not found: {}", .path.display())]
    EnvironmentFileMissing { path: PathBuf },

    /// An inherited search path cannot be represented as text.
    #[error("{name} contains bytes that are not valid Unicode; fix it before running setup")]
    NonUnicodeVariable { name: String },

    /// Invalid configuration value.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

impl SetupError {
    /// Build a `CommandFailed` error.
    pub fn command_failed(command: impl ToString, code: Option<i32>) -> Self {
        Self::CommandFailed {
            command: command.to_string(),
            code,
        }
    }

    /// Build a `Spawn` error.
    pub fn spawn(command: impl ToString, source: std::io::Error) -> Self {
        Self::Spawn {
            command: command.to_string(),
            source,
        }
    }

    /// Map the error to a process exit code.
    ///
    /// A failing external command passes its own status through. Other
    /// errors use the closest sysexits.h value:
    /// - 64: invalid configuration (`EX_USAGE`)
    /// - 65: unreadable tool output (`EX_DATAERR`)
    /// - 66: missing environment file (`EX_NOINPUT`)
    /// - 69: a required tool is not installed (`EX_UNAVAILABLE`)
    /// - 71: the OS refused to start a process (`EX_OSERR`)
    /// - 78: unusable inherited environment (`EX_CONFIG`)
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::CommandFailed { code, .. } => match code {
                Some(code) if *code != 0 => *code,
                _ => 1,
            },
            Self::Spawn { source, .. } if source.kind() == std::io::ErrorKind::NotFound => 69,
            Self::Spawn { .. } => 71,
            Self::InvalidUtf8 { .. } | Self::EmptyOutput { .. } | Self::EnvList(_) => 65,
            Self::EnvironmentFileMissing { .. } => 66,
            Self::CondaNotFound(_) => 69,
            Self::Validation(_) => 64,
            Self::NonUnicodeVariable { .. } => 78,
        }
    }
}

fn describe_exit(code: &Option<i32>) -> String {
    code.map_or_else(
        || "terminated by signal".to_string(),
        |code| format!("exit status {code}"),
    )
}

/// Result type alias for setup operations.
pub type SetupResult<T> = Result<T, SetupError>;
