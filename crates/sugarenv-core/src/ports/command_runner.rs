//! Command runner trait definition.

use crate::command::ToolCommand;
use crate::env::ToolchainEnv;
use crate::error::SetupResult;

/// Runs external commands to completion.
///
/// Both methods block until the child exits and apply every variable in
/// `env` to the child. A non-zero exit is reported as
/// [`SetupError::CommandFailed`](crate::SetupError::CommandFailed) with
/// the child's status code.
pub trait CommandRunner {
    /// Run a command with its output going straight to the user.
    fn run(&self, command: &ToolCommand, env: &ToolchainEnv) -> SetupResult<()>;

    /// Run a command and return its standard output.
    fn capture(&self, command: &ToolCommand, env: &ToolchainEnv) -> SetupResult<String>;
}
