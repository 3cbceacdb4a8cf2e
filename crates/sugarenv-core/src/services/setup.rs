//! The setup procedure.
//!
//! Steps run strictly in order and the first failure ends the run:
//!
//! 1. create or update the conda environment from the environment file
//! 2. install the conda-forge GCC/G++ host compilers into it
//! 3. locate those compilers and export `CC`, `CXX`, `CUDAHOSTCXX`
//! 4. if a CUDA root is configured, export `CUDA_HOME` and extend
//!    `PATH`/`LD_LIBRARY_PATH`
//! 5. print `--version` of both compilers and nvcc
//!
//! Every command after step 3 sees the variables exported so far.

use std::path::PathBuf;

use tracing::{debug, warn};

use crate::command::ToolCommand;
use crate::compiler::{HOST_CC, HOST_CXX, HostCompilers};
use crate::conda::{CondaCommands, EnvAction, parse_env_list};
use crate::config::SetupConfig;
use crate::cuda::CudaRoot;
use crate::env::{ToolchainEnv, names};
use crate::error::{SetupError, SetupResult};
use crate::events::SetupEvent;
use crate::ports::{CommandRunner, SetupEventSink};
use crate::version::{HostCompat, check_host_compiler, parse_gcc_version, parse_nvcc_release};

/// Raw `--version` output of each tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolVersions {
    pub cc: String,
    pub cxx: String,
    pub nvcc: String,
}

/// Outcome of a completed setup run.
#[derive(Debug, Clone)]
pub struct SetupReport {
    pub action: EnvAction,
    pub compilers: HostCompilers,
    pub cuda: Option<CudaRoot>,
    /// Every variable the run exported, layered over the inherited ones.
    pub env: ToolchainEnv,
    pub versions: ToolVersions,
    pub host_compat: HostCompat,
}

/// Sequences the setup steps against a [`CommandRunner`].
pub struct SetupService<'a> {
    runner: &'a dyn CommandRunner,
    events: &'a dyn SetupEventSink,
}

impl<'a> SetupService<'a> {
    pub fn new(runner: &'a dyn CommandRunner, events: &'a dyn SetupEventSink) -> Self {
        Self { runner, events }
    }

    /// Run the whole procedure.
    ///
    /// `env` carries the inherited search paths; the returned report holds
    /// it with the run's exports applied.
    pub fn run(&self, config: &SetupConfig, mut env: ToolchainEnv) -> SetupResult<SetupReport> {
        config.validate()?;
        debug!(?config, "Starting environment setup");

        let action = self.ensure_environment(config, &env)?;
        self.install_host_compilers(config, &env)?;

        let compilers = self.discover_host_compilers(config, &env)?;
        env.apply_host_compilers(&compilers);
        for name in [names::CC, names::CXX, names::CUDAHOSTCXX] {
            self.emit_exported(&env, name);
        }

        let cuda = config.cuda_home.clone().map(CudaRoot::new);
        if let Some(cuda) = &cuda {
            env.apply_cuda(cuda);
            self.events.emit(SetupEvent::CudaConfigured {
                root: cuda.path().to_path_buf(),
                lib_dir: cuda.lib64_dir(),
            });
        }

        let versions = self.verify_toolchain(&compilers, cuda.as_ref(), &env)?;
        let host_compat = self.check_host_compat(&versions);

        Ok(SetupReport {
            action,
            compilers,
            cuda,
            env,
            versions,
            host_compat,
        })
    }

    /// Create the environment if conda does not list it, update it otherwise.
    pub fn ensure_environment(
        &self,
        config: &SetupConfig,
        env: &ToolchainEnv,
    ) -> SetupResult<EnvAction> {
        let conda = CondaCommands::new(&config.conda);
        let name = config.conda_env.as_str();

        self.events.emit(SetupEvent::CheckingEnvironment {
            env: name.to_string(),
        });

        let listing = self.runner.capture(&conda.env_list(), env)?;
        let exists = parse_env_list(&listing)?.contains(name);
        let action = EnvAction::select(exists);
        debug!(env = name, exists, ?action, "Checked conda environment listing");

        if !config.environment_file.is_file() {
            return Err(SetupError::EnvironmentFileMissing {
                path: config.environment_file.clone(),
            });
        }

        let file = config.environment_file.clone();
        self.events.emit(match action {
            EnvAction::Create => SetupEvent::CreatingEnvironment {
                env: name.to_string(),
                file,
            },
            EnvAction::Update => SetupEvent::UpdatingEnvironment {
                env: name.to_string(),
                file,
            },
        });

        self.runner
            .run(&conda.sync_env(action, name, &config.environment_file), env)?;
        Ok(action)
    }

    /// Install `gcc_linux-64` and `gxx_linux-64` at the configured major version.
    pub fn install_host_compilers(
        &self,
        config: &SetupConfig,
        env: &ToolchainEnv,
    ) -> SetupResult<()> {
        self.events.emit(SetupEvent::InstallingHostCompilers {
            env: config.conda_env.clone(),
            gcc_major: config.gcc_major,
        });
        let conda = CondaCommands::new(&config.conda);
        self.runner.run(
            &conda.install_host_compilers(&config.conda_env, config.gcc_major),
            env,
        )
    }

    /// Resolve the absolute paths of the conda host compilers.
    pub fn discover_host_compilers(
        &self,
        config: &SetupConfig,
        env: &ToolchainEnv,
    ) -> SetupResult<HostCompilers> {
        let conda = CondaCommands::new(&config.conda);
        let locate = |tool: &str| -> SetupResult<PathBuf> {
            let command = conda.which_in_env(&config.conda_env, tool);
            let output = self.runner.capture(&command, env)?;
            // `conda run` may print activation noise first; the path is last.
            let path = output
                .lines()
                .map(str::trim)
                .rfind(|line| !line.is_empty())
                .ok_or_else(|| SetupError::EmptyOutput {
                    command: command.to_string(),
                })?;
            Ok(PathBuf::from(path))
        };

        let compilers = HostCompilers::new(locate(HOST_CC)?, locate(HOST_CXX)?);
        debug!(
            cc = %compilers.cc.display(),
            cxx = %compilers.cxx.display(),
            "Located host compilers"
        );
        Ok(compilers)
    }

    /// Capture `--version` of the compilers and nvcc.
    ///
    /// nvcc comes from the CUDA root when one is configured, from `PATH`
    /// otherwise.
    pub fn verify_toolchain(
        &self,
        compilers: &HostCompilers,
        cuda: Option<&CudaRoot>,
        env: &ToolchainEnv,
    ) -> SetupResult<ToolVersions> {
        self.events.emit(SetupEvent::VerifyingToolchain);

        let nvcc = cuda.map_or_else(|| PathBuf::from("nvcc"), CudaRoot::nvcc);
        let version_of = |program: &PathBuf| -> SetupResult<String> {
            let output = self
                .runner
                .capture(&ToolCommand::new(program).arg("--version"), env)?;
            self.events.emit(SetupEvent::ToolVersion {
                tool: program.to_string_lossy().into_owned(),
                output: output.clone(),
            });
            Ok(output)
        };

        Ok(ToolVersions {
            cc: version_of(&compilers.cc)?,
            cxx: version_of(&compilers.cxx)?,
            nvcc: version_of(&nvcc)?,
        })
    }

    fn check_host_compat(&self, versions: &ToolVersions) -> HostCompat {
        let cuda = parse_nvcc_release(&versions.nvcc);
        let gcc = parse_gcc_version(&versions.cxx);
        let compat = check_host_compiler(cuda, gcc);

        if let (HostCompat::Unsupported { max_gcc_major }, Some(cuda), Some(gcc)) =
            (compat, cuda, gcc)
        {
            warn!(?cuda, ?gcc, max_gcc_major, "Host compiler is newer than nvcc supports");
            self.events.emit(SetupEvent::HostCompilerUnsupported {
                cuda,
                gcc,
                max_gcc_major,
            });
        }
        compat
    }

    fn emit_exported(&self, env: &ToolchainEnv, name: &str) {
        if let Some(value) = env.get(name) {
            self.events.emit(SetupEvent::VariableExported {
                name: name.to_string(),
                value: value.to_string(),
            });
        }
    }
}
