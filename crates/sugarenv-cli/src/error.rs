//! Exit-code mapping for the CLI.

use std::process::ExitCode;

use sugarenv_core::SetupError;

/// Map a top-level error to the process exit code.
///
/// Setup errors carry their own code (a failing command passes its status
/// through); anything else is a general failure.
pub fn exit_code(err: &anyhow::Error) -> ExitCode {
    ExitCode::from(exit_status(err))
}

fn exit_status(err: &anyhow::Error) -> u8 {
    let code = err.downcast_ref::<SetupError>().map_or(1, SetupError::exit_code);
    // Statuses outside 1..=255 cannot be reported faithfully.
    u8::try_from(code).ok().filter(|c| *c != 0).unwrap_or(1)
}
