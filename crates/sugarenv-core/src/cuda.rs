//! CUDA installation layout.

use std::path::{Path, PathBuf};

/// Root directory of a CUDA toolkit install, e.g. `/usr/local/cuda-11.8`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CudaRoot(PathBuf);

impl CudaRoot {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self(root.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    /// Directory holding `nvcc` and the other toolkit binaries.
    pub fn bin_dir(&self) -> PathBuf {
        self.0.join("bin")
    }

    /// Directory holding the toolkit's shared libraries.
    pub fn lib64_dir(&self) -> PathBuf {
        self.0.join("lib64")
    }

    pub fn nvcc(&self) -> PathBuf {
        self.bin_dir().join("nvcc")
    }
}
