//! Progress events emitted while a setup run advances.
//!
//! The service reports what it is doing through these events and leaves
//! rendering to the adapter. The CLI prints them as `[INFO]` lines.

use std::path::PathBuf;

/// One step of progress in a setup run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupEvent {
    /// Looking up the environment in `conda env list`.
    CheckingEnvironment { env: String },

    /// The environment is absent and will be created.
    CreatingEnvironment { env: String, file: PathBuf },

    /// The environment exists and will be updated in place.
    UpdatingEnvironment { env: String, file: PathBuf },

    /// Installing `gcc_linux-64`/`gxx_linux-64` into the environment.
    InstallingHostCompilers { env: String, gcc_major: u32 },

    /// A variable was exported for later build steps.
    VariableExported { name: String, value: String },

    /// CUDA variables now point at this installation.
    CudaConfigured { root: PathBuf, lib_dir: PathBuf },

    /// About to print compiler and nvcc versions.
    VerifyingToolchain,

    /// Raw `--version` output of one tool.
    ToolVersion { tool: String, output: String },

    /// nvcc does not accept this GCC as a host compiler.
    HostCompilerUnsupported {
        cuda: (u32, u32),
        gcc: (u32, u32),
        max_gcc_major: u32,
    },
}
