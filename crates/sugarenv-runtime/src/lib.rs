#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

pub mod conda;
pub mod runner;

pub use conda::resolve_conda_executable;
pub use runner::{ProgressStream, SystemCommandRunner};

#[cfg(test)]
use tempfile as _;
