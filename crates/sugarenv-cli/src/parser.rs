//! Main CLI parser and top-level argument handling.

use std::path::PathBuf;

use clap::Parser;
use sugarenv_core::{
    DEFAULT_CONDA_ENV, DEFAULT_CUDA_HOME, DEFAULT_ENVIRONMENT_FILE, DEFAULT_GCC_MAJOR,
};

/// Command-line interface definition for the environment bootstrapper.
///
/// Flag names `--cuda_home` and `--conda_env` keep their underscore
/// spelling so existing setup instructions keep working.
#[derive(Debug, Parser)]
#[command(name = "sugarenv")]
#[command(about = "Set up the SuGaR conda env, GCC host toolchain and CUDA variables")]
#[command(version)]
pub struct Cli {
    /// Path to CUDA (typically /usr/local/cuda-11.8). Pass an empty value to use the default nvcc
    #[arg(
        long = "cuda_home",
        env = "SUGARENV_CUDA_HOME",
        default_value = DEFAULT_CUDA_HOME,
        value_name = "PATH"
    )]
    pub cuda_home: String,

    /// Name of the conda environment
    #[arg(
        long = "conda_env",
        env = "SUGARENV_CONDA_ENV",
        default_value = DEFAULT_CONDA_ENV,
        value_name = "NAME"
    )]
    pub conda_env: String,

    /// Environment file for `conda env create/update`
    #[arg(
        long = "environment-file",
        env = "SUGARENV_ENVIRONMENT_FILE",
        default_value = DEFAULT_ENVIRONMENT_FILE,
        value_name = "FILE"
    )]
    pub environment_file: PathBuf,

    /// Major version of the conda-forge GCC/G++ host compilers
    #[arg(
        long = "gcc-version",
        env = "SUGARENV_GCC_VERSION",
        default_value_t = DEFAULT_GCC_MAJOR,
        value_parser = clap::value_parser!(u32).range(1..),
        value_name = "MAJOR"
    )]
    pub gcc_version: u32,

    /// conda executable (defaults to $CONDA_EXE, then conda on PATH)
    #[arg(long = "conda", env = "SUGARENV_CONDA", value_name = "PATH")]
    pub conda: Option<PathBuf>,

    /// Print `export` lines for the configured variables on stdout
    #[arg(long = "print-exports")]
    pub print_exports: bool,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl Cli {
    /// The CUDA root, or `None` when an empty value disabled it.
    pub fn cuda_home(&self) -> Option<PathBuf> {
        let trimmed = self.cuda_home.trim();
        (!trimmed.is_empty()).then(|| PathBuf::from(trimmed))
    }
}
