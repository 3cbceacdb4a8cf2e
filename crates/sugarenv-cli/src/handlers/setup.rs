//! Setup handler.
//!
//! Wires the system command runner and console output into the core
//! `SetupService` and prints export lines on request.

use anyhow::Result;
use sugarenv_core::{SetupConfig, SetupReport, SetupService, ToolchainEnv};
use sugarenv_runtime::{ProgressStream, SystemCommandRunner, resolve_conda_executable};
use tracing::debug;

use crate::parser::Cli;
use crate::presentation::ConsoleSink;

/// Execute the setup procedure described by `cli`.
pub fn execute(cli: &Cli) -> Result<SetupReport> {
    let stream = progress_stream(cli);
    let inherited = ToolchainEnv::inherit_from_process()?;
    let conda = resolve_conda_executable(cli.conda.as_deref())?;
    let config = build_config(cli, conda);
    debug!(?config, "Resolved setup configuration");

    let runner = SystemCommandRunner::new(stream);
    let sink = ConsoleSink::new(stream);
    let report = SetupService::new(&runner, &sink).run(&config, inherited)?;

    if cli.print_exports {
        for line in report.env.export_lines() {
            println!("{line}");
        }
    }

    Ok(report)
}

/// Progress moves to stderr when stdout is reserved for export lines.
pub const fn progress_stream(cli: &Cli) -> ProgressStream {
    if cli.print_exports {
        ProgressStream::Stderr
    } else {
        ProgressStream::Stdout
    }
}

/// Translate parsed arguments into a `SetupConfig`.
pub fn build_config(cli: &Cli, conda: impl Into<std::path::PathBuf>) -> SetupConfig {
    SetupConfig::new(cli.conda_env.clone())
        .with_conda(conda)
        .with_cuda_home(cli.cuda_home())
        .with_environment_file(cli.environment_file.clone())
        .with_gcc_major(cli.gcc_version)
}
