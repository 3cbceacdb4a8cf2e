//! Host compiler pair provided by conda's `gcc_linux-64`/`gxx_linux-64`.

use std::path::PathBuf;

/// C compiler installed by `gcc_linux-64`.
pub const HOST_CC: &str = "x86_64-conda-linux-gnu-cc";

/// C++ compiler installed by `gxx_linux-64`.
pub const HOST_CXX: &str = "x86_64-conda-linux-gnu-c++";

/// Absolute paths of the host compilers inside the conda environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostCompilers {
    pub cc: PathBuf,
    pub cxx: PathBuf,
}

impl HostCompilers {
    pub fn new(cc: impl Into<PathBuf>, cxx: impl Into<PathBuf>) -> Self {
        Self {
            cc: cc.into(),
            cxx: cxx.into(),
        }
    }
}
