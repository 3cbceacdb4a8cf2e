#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

pub mod command;
pub mod compiler;
pub mod conda;
pub mod config;
pub mod cuda;
pub mod env;
pub mod error;
pub mod events;
pub mod ports;
pub mod services;
pub mod version;

// Re-export commonly used types for convenience
pub use command::{ToolCommand, shell_quote};
pub use compiler::HostCompilers;
pub use conda::{CondaCommands, EnvAction, EnvList, parse_env_list};
pub use config::{
    DEFAULT_CONDA_ENV, DEFAULT_CUDA_HOME, DEFAULT_ENVIRONMENT_FILE, DEFAULT_GCC_MAJOR, SetupConfig,
};
pub use cuda::CudaRoot;
pub use env::ToolchainEnv;
pub use error::{SetupError, SetupResult};
pub use events::SetupEvent;
pub use ports::{CommandRunner, NoopEventSink, SetupEventSink};
pub use services::{SetupReport, SetupService, ToolVersions};
pub use version::HostCompat;

// Dev-dependencies used only by the integration tests
#[cfg(test)]
use mockall as _;
#[cfg(test)]
use tempfile as _;
