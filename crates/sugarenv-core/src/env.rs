//! Toolchain environment variables.
//!
//! A setup run produces a handful of variables that later build steps need.
//! They are collected in a [`ToolchainEnv`] and passed to each child process
//! the run spawns; the current process environment is only ever read.

use std::ffi::OsString;
use std::path::Path;

use crate::command::shell_quote;
use crate::compiler::HostCompilers;
use crate::cuda::CudaRoot;
use crate::error::{SetupError, SetupResult};

/// Variable names written by a setup run.
pub mod names {
    pub const CC: &str = "CC";
    pub const CXX: &str = "CXX";
    pub const CUDAHOSTCXX: &str = "CUDAHOSTCXX";
    pub const CUDA_HOME: &str = "CUDA_HOME";
    pub const PATH: &str = "PATH";
    pub const LD_LIBRARY_PATH: &str = "LD_LIBRARY_PATH";
}

const SEARCH_PATH_SEPARATOR: char = ':';

/// Variables set during a run, layered over inherited search paths.
///
/// `base` holds the values inherited from the parent environment and is
/// consulted when extending a search path. `vars` holds what the run has
/// set, in the order it was first set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolchainEnv {
    base: Vec<(String, String)>,
    vars: Vec<(String, String)>,
}

impl ToolchainEnv {
    /// An empty overlay with no inherited values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the inherited `PATH` and `LD_LIBRARY_PATH` from this process.
    ///
    /// A value that is not valid Unicode is an error: extending it would
    /// otherwise replace the user's search path instead of prepending to it.
    pub fn inherit_from_process() -> SetupResult<Self> {
        Self::inherit_from(|k: &str| std::env::var_os(k))
    }

    /// Seed the inherited search paths from `lookup`.
    pub fn inherit_from(lookup: impl Fn(&str) -> Option<OsString>) -> SetupResult<Self> {
        let mut env = Self::new();
        for name in [names::PATH, names::LD_LIBRARY_PATH] {
            if let Some(value) = lookup(name) {
                let value = value
                    .into_string()
                    .map_err(|_| SetupError::NonUnicodeVariable {
                        name: name.to_string(),
                    })?;
                env = env.with_base(name, value);
            }
        }
        Ok(env)
    }

    /// Record an inherited value without marking it as set by the run.
    #[must_use]
    pub fn with_base(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        upsert(&mut self.base, name.into(), value.into());
        self
    }

    /// Current value: the one set by the run, else the inherited one.
    pub fn get(&self, name: &str) -> Option<&str> {
        lookup(&self.vars, name).or_else(|| lookup(&self.base, name))
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        upsert(&mut self.vars, name.into(), value.into());
    }

    /// Put `dir` at the front of the search path `name`.
    ///
    /// Idempotent: an existing occurrence of `dir` is moved rather than
    /// duplicated, and empty entries are dropped.
    pub fn prepend_path(&mut self, name: &str, dir: &Path) {
        let entry = dir.to_string_lossy().into_owned();
        let value = {
            let current = self.get(name).unwrap_or_default();
            let rest = current
                .split(SEARCH_PATH_SEPARATOR)
                .filter(|p| !p.is_empty() && *p != entry);
            std::iter::once(entry.as_str())
                .chain(rest)
                .collect::<Vec<_>>()
                .join(":")
        };
        self.set(name, value);
    }

    /// Export the conda host compilers as `CC`, `CXX` and `CUDAHOSTCXX`.
    pub fn apply_host_compilers(&mut self, compilers: &HostCompilers) {
        let cc = compilers.cc.to_string_lossy().into_owned();
        let cxx = compilers.cxx.to_string_lossy().into_owned();
        self.set(names::CC, cc);
        self.set(names::CXX, cxx.clone());
        self.set(names::CUDAHOSTCXX, cxx);
    }

    /// Point `CUDA_HOME` at `cuda` and put its `bin` and `lib64` first on
    /// `PATH` and `LD_LIBRARY_PATH`.
    pub fn apply_cuda(&mut self, cuda: &CudaRoot) {
        self.set(names::CUDA_HOME, cuda.path().to_string_lossy().into_owned());
        self.prepend_path(names::PATH, &cuda.bin_dir());
        self.prepend_path(names::LD_LIBRARY_PATH, &cuda.lib64_dir());
    }

    /// Variables set by the run, in the order they were first set.
    pub fn vars(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// `export NAME=value` lines for every variable the run set.
    pub fn export_lines(&self) -> Vec<String> {
        self.vars()
            .map(|(name, value)| format!("export {name}={}", shell_quote(value)))
            .collect()
    }
}

fn lookup<'a>(entries: &'a [(String, String)], name: &str) -> Option<&'a str> {
    entries
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
}

fn upsert(entries: &mut Vec<(String, String)>, name: String, value: String) {
    if let Some(slot) = entries.iter_mut().find(|(k, _)| *k == name) {
        slot.1 = value;
    } else {
        entries.push((name, value));
    }
}
