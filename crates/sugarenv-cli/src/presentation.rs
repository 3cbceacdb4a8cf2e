//! Console rendering of setup progress.
//!
//! Lines mirror the classic setup script output: `[INFO]` for progress,
//! `[WARN]` for non-fatal problems, raw tool output for version checks.

use sugarenv_core::{SetupEvent, SetupEventSink};
use sugarenv_runtime::ProgressStream;

/// Prints setup events as they happen.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleSink {
    stream: ProgressStream,
}

impl ConsoleSink {
    pub const fn new(stream: ProgressStream) -> Self {
        Self { stream }
    }
}

impl SetupEventSink for ConsoleSink {
    fn emit(&self, event: SetupEvent) {
        for line in format_event(&event) {
            self.stream.line(line);
        }
    }
}

/// Render one event as the lines to print.
pub fn format_event(event: &SetupEvent) -> Vec<String> {
    match event {
        SetupEvent::CheckingEnvironment { env } => {
            vec![format!("[INFO] Checking for '{env}' conda environment…")]
        }
        SetupEvent::CreatingEnvironment { env, file } => vec![format!(
            "[INFO] '{env}' not found; creating from {}",
            file.display()
        )],
        SetupEvent::UpdatingEnvironment { env, file } => vec![format!(
            "[INFO] '{env}' exists; updating from {}",
            file.display()
        )],
        SetupEvent::InstallingHostCompilers { env, gcc_major } => vec![format!(
            "[INFO] Installing GCC/G++ {gcc_major} into '{env}'…"
        )],
        SetupEvent::VariableExported { name, value } => {
            vec![format!("[INFO] export {name:<11} = {value}")]
        }
        SetupEvent::CudaConfigured { root, lib_dir } => vec![
            format!("[INFO] export CUDA_HOME from: {}", root.display()),
            format!(
                "[INFO] export LD_LIBRARY_PATH to include: {}",
                lib_dir.display()
            ),
        ],
        SetupEvent::VerifyingToolchain => {
            vec!["[INFO] Verifying GCC/G++ and CUDA toolchain versions:".to_string()]
        }
        SetupEvent::ToolVersion { output, .. } => vec![output.clone()],
        SetupEvent::HostCompilerUnsupported {
            cuda: (cuda_major, cuda_minor),
            gcc: (gcc_major, gcc_minor),
            max_gcc_major,
        } => vec![format!(
            "[WARN] CUDA {cuda_major}.{cuda_minor} does not support GCC {gcc_major}.{gcc_minor} \
             as host compiler (newest supported: GCC {max_gcc_major}); \
             try --gcc-version {max_gcc_major}"
        )],
    }
}
