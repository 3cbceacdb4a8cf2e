//! Setup configuration and its defaults.

use std::path::PathBuf;

use crate::error::{SetupError, SetupResult};

/// Default conda environment name.
pub const DEFAULT_CONDA_ENV: &str = "sugar";

/// Default CUDA installation root.
pub const DEFAULT_CUDA_HOME: &str = "/usr/local/cuda-11.8";

/// Default environment file used for `conda env create/update`.
pub const DEFAULT_ENVIRONMENT_FILE: &str = "environment.yml";

/// Default GCC major version. CUDA 11.8 accepts GCC up to 11.
pub const DEFAULT_GCC_MAJOR: u32 = 11;

/// Everything a setup run needs to know.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupConfig {
    /// conda executable to invoke.
    pub conda: PathBuf,
    /// Name of the conda environment to create or update.
    pub conda_env: String,
    /// CUDA installation root. `None` means use whatever `nvcc` is on `PATH`.
    pub cuda_home: Option<PathBuf>,
    /// Environment file passed to `conda env create/update -f`.
    pub environment_file: PathBuf,
    /// Major version of `gcc_linux-64`/`gxx_linux-64` to install.
    pub gcc_major: u32,
}

impl SetupConfig {
    /// Create a config for `conda_env` with every other field at its default.
    pub fn new(conda_env: impl Into<String>) -> Self {
        Self {
            conda: PathBuf::from("conda"),
            conda_env: conda_env.into(),
            cuda_home: Some(PathBuf::from(DEFAULT_CUDA_HOME)),
            environment_file: PathBuf::from(DEFAULT_ENVIRONMENT_FILE),
            gcc_major: DEFAULT_GCC_MAJOR,
        }
    }

    #[must_use]
    pub fn with_conda(mut self, conda: impl Into<PathBuf>) -> Self {
        self.conda = conda.into();
        self
    }

    #[must_use]
    pub fn with_cuda_home(mut self, cuda_home: Option<PathBuf>) -> Self {
        self.cuda_home = cuda_home;
        self
    }

    #[must_use]
    pub fn with_environment_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.environment_file = path.into();
        self
    }

    #[must_use]
    pub const fn with_gcc_major(mut self, major: u32) -> Self {
        self.gcc_major = major;
        self
    }

    /// Reject values that would produce a malformed conda invocation.
    pub fn validate(&self) -> SetupResult<()> {
        let name = self.conda_env.as_str();
        if name.trim().is_empty() {
            return Err(SetupError::Validation(
                "conda environment name must not be empty".to_string(),
            ));
        }
        if name.starts_with('-') {
            return Err(SetupError::Validation(format!(
                "conda environment name must not start with '-': {name}"
            )));
        }
        if name.chars().any(|c| c.is_whitespace() || c == '/' || c == '\\') {
            return Err(SetupError::Validation(format!(
                "conda environment name must not contain whitespace or path separators: {name}"
            )));
        }
        if self.gcc_major == 0 {
            return Err(SetupError::Validation(
                "GCC major version must be at least 1".to_string(),
            ));
        }
        if self
            .cuda_home
            .as_ref()
            .is_some_and(|p| p.as_os_str().is_empty())
        {
            return Err(SetupError::Validation(
                "CUDA root must not be an empty path".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for SetupConfig {
    fn default() -> Self {
        Self::new(DEFAULT_CONDA_ENV)
    }
}
