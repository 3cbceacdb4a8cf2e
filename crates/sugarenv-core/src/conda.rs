//! conda command construction and environment listing.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::command::ToolCommand;
use crate::error::SetupResult;

/// Channel the host compiler packages are installed from.
pub const CONDA_FORGE: &str = "conda-forge";

/// Output of `conda env list --json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EnvList {
    /// Absolute prefixes of every known environment.
    pub envs: Vec<PathBuf>,
}

impl EnvList {
    /// Whether an environment called `name` is listed.
    ///
    /// Named environments live at `<root>/envs/<name>`, so the check is on
    /// the last path component.
    pub fn contains(&self, name: &str) -> bool {
        self.envs
            .iter()
            .any(|prefix| prefix.file_name().is_some_and(|n| n == name))
    }
}

/// Parse the JSON printed by `conda env list --json`.
pub fn parse_env_list(json: &str) -> SetupResult<EnvList> {
    Ok(serde_json::from_str(json)?)
}

/// Whether the environment has to be created or only updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvAction {
    Create,
    Update,
}

impl EnvAction {
    /// Pick the action for an environment that does or does not exist yet.
    pub const fn select(exists: bool) -> Self {
        if exists { Self::Update } else { Self::Create }
    }
}

/// Builders for the conda invocations used by a setup run.
#[derive(Debug, Clone, Copy)]
pub struct CondaCommands<'a> {
    conda: &'a Path,
}

impl<'a> CondaCommands<'a> {
    pub const fn new(conda: &'a Path) -> Self {
        Self { conda }
    }

    fn command(&self) -> ToolCommand {
        ToolCommand::new(self.conda)
    }

    /// `conda env list --json`
    pub fn env_list(&self) -> ToolCommand {
        self.command().args(["env", "list", "--json"])
    }

    /// `conda env create -n <env> -f <file>`
    pub fn env_create(&self, env: &str, file: &Path) -> ToolCommand {
        self.command()
            .args(["env", "create", "-n", env, "-f"])
            .arg(file.to_string_lossy())
    }

    /// `conda env update -n <env> -f <file>`
    pub fn env_update(&self, env: &str, file: &Path) -> ToolCommand {
        self.command()
            .args(["env", "update", "-n", env, "-f"])
            .arg(file.to_string_lossy())
    }

    /// The create or update command for `action`.
    pub fn sync_env(&self, action: EnvAction, env: &str, file: &Path) -> ToolCommand {
        match action {
            EnvAction::Create => self.env_create(env, file),
            EnvAction::Update => self.env_update(env, file),
        }
    }

    /// `conda install -n <env> -c conda-forge gcc_linux-64=<N> gxx_linux-64=<N> -y`
    pub fn install_host_compilers(&self, env: &str, gcc_major: u32) -> ToolCommand {
        self.command()
            .args(["install", "-n", env, "-c", CONDA_FORGE])
            .arg(format!("gcc_linux-64={gcc_major}"))
            .arg(format!("gxx_linux-64={gcc_major}"))
            .arg("-y")
    }

    /// `conda run -n <env> bash -lc 'which <tool>'`
    ///
    /// A login shell is used so the environment's activation scripts run.
    pub fn which_in_env(&self, env: &str, tool: &str) -> ToolCommand {
        self.command()
            .args(["run", "-n", env, "bash", "-lc"])
            .arg(format!("which {tool}"))
    }
}
