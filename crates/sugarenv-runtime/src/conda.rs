//! Locating the conda executable.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use sugarenv_core::{SetupError, SetupResult};
use tracing::debug;

/// Variable conda's activation scripts set to the active conda binary.
pub const CONDA_EXE_VAR: &str = "CONDA_EXE";

/// Find the conda executable.
///
/// Priority: the explicit path or name, then `$CONDA_EXE`, then `conda`
/// on `PATH`.
pub fn resolve_conda_executable(explicit: Option<&Path>) -> SetupResult<PathBuf> {
    resolve_with(explicit, std::env::var_os(CONDA_EXE_VAR))
}

fn resolve_with(explicit: Option<&Path>, conda_exe: Option<OsString>) -> SetupResult<PathBuf> {
    if let Some(path) = explicit {
        let found = which::which(path)
            .map_err(|e| SetupError::CondaNotFound(format!("{}: {e}", path.display())))?;
        debug!(conda = %found.display(), "Using conda from command line");
        return Ok(found);
    }

    if let Some(exe) = conda_exe.filter(|v| !v.is_empty()) {
        match which::which(&exe) {
            Ok(found) => {
                debug!(conda = %found.display(), "Using conda from {CONDA_EXE_VAR}");
                return Ok(found);
            }
            Err(e) => {
                debug!(value = ?exe, error = %e, "Ignoring unusable {CONDA_EXE_VAR}");
            }
        }
    }

    which::which("conda").map_err(|e| {
        SetupError::CondaNotFound(format!(
            "{e}; install Miniconda/Miniforge or pass --conda <path>"
        ))
    })
}
