//! Blocking implementation of the `CommandRunner` port.

use std::fmt::Display;
use std::io::{self, Write};
use std::process::{Command, ExitStatus, Output, Stdio};

use sugarenv_core::{CommandRunner, SetupError, SetupResult, ToolCommand, ToolchainEnv};
use tracing::debug;

/// Where progress text and the output of `run` commands go.
///
/// `Stderr` keeps stdout free for machine-readable output such as
/// `export` lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProgressStream {
    #[default]
    Stdout,
    Stderr,
}

impl ProgressStream {
    /// Write one line of progress text and flush it, so it lands before
    /// the output of any child started afterwards.
    pub fn line(self, text: impl Display) {
        // A closed terminal is not worth failing the setup over.
        let _ = match self {
            Self::Stdout => write_line(io::stdout().lock(), text),
            Self::Stderr => write_line(io::stderr().lock(), text),
        };
    }

    fn child_stdout(self) -> Stdio {
        match self {
            Self::Stdout => Stdio::inherit(),
            Self::Stderr => Stdio::from(io::stderr()),
        }
    }
}

fn write_line(mut out: impl Write, text: impl Display) -> io::Result<()> {
    writeln!(out, "{text}")?;
    out.flush()
}

/// Runs commands with `std::process`, waiting for each to finish.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandRunner {
    stream: ProgressStream,
}

impl SystemCommandRunner {
    pub const fn new(stream: ProgressStream) -> Self {
        Self { stream }
    }

    fn command(command: &ToolCommand, env: &ToolchainEnv) -> Command {
        let mut cmd = Command::new(command.program());
        cmd.args(command.arguments())
            .envs(env.vars())
            .stdin(Stdio::null());
        cmd
    }
}

impl CommandRunner for SystemCommandRunner {
    fn run(&self, command: &ToolCommand, env: &ToolchainEnv) -> SetupResult<()> {
        self.stream.line(format_args!("[RUN] {command}"));

        let status = Self::command(command, env)
            .stdout(self.stream.child_stdout())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| SetupError::spawn(command, e))?;

        check_status(command, status)
    }

    fn capture(&self, command: &ToolCommand, env: &ToolchainEnv) -> SetupResult<String> {
        debug!(%command, "Capturing command output");

        let Output { status, stdout, .. } = Self::command(command, env)
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .output()
            .map_err(|e| SetupError::spawn(command, e))?;

        check_status(command, status)?;
        String::from_utf8(stdout).map_err(|_| SetupError::InvalidUtf8 {
            command: command.to_string(),
        })
    }
}

fn check_status(command: &ToolCommand, status: ExitStatus) -> SetupResult<()> {
    if status.success() {
        debug!(%command, "Command succeeded");
        return Ok(());
    }
    debug!(%command, ?status, "Command failed");
    Err(SetupError::command_failed(command, status.code()))
}
