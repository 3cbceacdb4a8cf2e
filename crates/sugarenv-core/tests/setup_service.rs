//! End-to-end tests of the setup procedure against a mocked command layer.

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use mockall::{Sequence, mock};
use sugarenv_core::{
    CommandRunner, EnvAction, HostCompat, SetupConfig, SetupError, SetupEvent, SetupEventSink,
    SetupService, ToolCommand, ToolchainEnv,
};
use tempfile::TempDir;

mock! {
    pub Runner {}

    impl CommandRunner for Runner {
        fn run(&self, command: &ToolCommand, env: &ToolchainEnv) -> Result<(), SetupError>;
        fn capture(&self, command: &ToolCommand, env: &ToolchainEnv) -> Result<String, SetupError>;
    }
}

#[derive(Default)]
struct RecordingSink {
    events: RefCell<Vec<SetupEvent>>,
}

impl SetupEventSink for RecordingSink {
    fn emit(&self, event: SetupEvent) {
        self.events.borrow_mut().push(event);
    }
}

const CC: &str = "/opt/conda/envs/sugar/bin/x86_64-conda-linux-gnu-cc";
const CXX: &str = "/opt/conda/envs/sugar/bin/x86_64-conda-linux-gnu-c++";
const GCC_11: &str = "x86_64-conda-linux-gnu-cc (conda-forge gcc 11.4.0-13) 11.4.0\n";
const NVCC_11_8: &str = "Cuda compilation tools, release 11.8, V11.8.89\n";

fn listing(with_sugar: bool) -> String {
    if with_sugar {
        r#"{"envs": ["/opt/conda", "/opt/conda/envs/sugar"]}"#.to_string()
    } else {
        r#"{"envs": ["/opt/conda", "/opt/conda/envs/other"]}"#.to_string()
    }
}

/// A temp dir holding an `environment.yml`, plus a config pointing at it.
fn fixture(cuda_home: Option<&str>) -> (TempDir, SetupConfig) {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("environment.yml");
    std::fs::write(&file, "name: sugar\ndependencies: []\n").unwrap();
    let config = SetupConfig::new("sugar")
        .with_environment_file(file)
        .with_cuda_home(cuda_home.map(PathBuf::from));
    (dir, config)
}

fn expect_capture(runner: &mut MockRunner, line: String, output: String, seq: &mut Sequence) {
    runner
        .expect_capture()
        .withf(move |cmd, _| cmd.to_string() == line)
        .times(1)
        .in_sequence(seq)
        .returning(move |_, _| Ok(output.clone()));
}

fn expect_run(runner: &mut MockRunner, line: String, seq: &mut Sequence) {
    runner
        .expect_run()
        .withf(move |cmd, _| cmd.to_string() == line)
        .times(1)
        .in_sequence(seq)
        .returning(|_, _| Ok(()));
}

/// Expectations for a full successful run, in order.
fn expect_full_run(runner: &mut MockRunner, config: &SetupConfig, exists: bool, nvcc: &str) {
    let mut seq = Sequence::new();
    let file = config.environment_file.display().to_string();
    let verb = if exists { "update" } else { "create" };

    expect_capture(runner, "conda env list --json".into(), listing(exists), &mut seq);
    expect_run(runner, format!("conda env {verb} -n sugar -f {file}"), &mut seq);
    expect_run(
        runner,
        "conda install -n sugar -c conda-forge gcc_linux-64=11 gxx_linux-64=11 -y".into(),
        &mut seq,
    );
    expect_capture(
        runner,
        "conda run -n sugar bash -lc 'which x86_64-conda-linux-gnu-cc'".into(),
        format!("{CC}\n"),
        &mut seq,
    );
    expect_capture(
        runner,
        "conda run -n sugar bash -lc 'which x86_64-conda-linux-gnu-c++'".into(),
        format!("{CXX}\n"),
        &mut seq,
    );
    expect_capture(runner, format!("{CC} --version"), GCC_11.into(), &mut seq);
    expect_capture(runner, format!("{CXX} --version"), GCC_11.into(), &mut seq);
    expect_capture(runner, format!("{nvcc} --version"), NVCC_11_8.into(), &mut seq);
}

#[test]
fn test_missing_environment_is_created() {
    let (_dir, config) = fixture(Some("/usr/local/cuda-11.8"));
    let mut runner = MockRunner::new();
    expect_full_run(&mut runner, &config, false, "/usr/local/cuda-11.8/bin/nvcc");

    let sink = RecordingSink::default();
    let report = SetupService::new(&runner, &sink)
        .run(&config, ToolchainEnv::new())
        .unwrap();

    assert_eq!(report.action, EnvAction::Create);
    assert!(sink.events.borrow().iter().any(|e| matches!(
        e,
        SetupEvent::CreatingEnvironment { env, .. } if env == "sugar"
    )));
}

#[test]
fn test_existing_environment_is_updated() {
    let (_dir, config) = fixture(Some("/usr/local/cuda-11.8"));
    let mut runner = MockRunner::new();
    expect_full_run(&mut runner, &config, true, "/usr/local/cuda-11.8/bin/nvcc");

    let report = SetupService::new(&runner, &sugarenv_core::NoopEventSink)
        .run(&config, ToolchainEnv::new())
        .unwrap();

    assert_eq!(report.action, EnvAction::Update);
    assert_eq!(report.host_compat, HostCompat::Supported);
}

#[test]
fn test_report_carries_exported_variables() {
    let (_dir, config) = fixture(Some("/usr/local/cuda-11.8"));
    let mut runner = MockRunner::new();
    expect_full_run(&mut runner, &config, true, "/usr/local/cuda-11.8/bin/nvcc");

    let inherited = ToolchainEnv::new()
        .with_base("PATH", "/usr/bin:/bin")
        .with_base("LD_LIBRARY_PATH", "/usr/lib");
    let report = SetupService::new(&runner, &sugarenv_core::NoopEventSink)
        .run(&config, inherited)
        .unwrap();

    let env = &report.env;
    assert_eq!(env.get("CC"), Some(CC));
    assert_eq!(env.get("CXX"), Some(CXX));
    assert_eq!(env.get("CUDAHOSTCXX"), Some(CXX));
    assert_eq!(env.get("CUDA_HOME"), Some("/usr/local/cuda-11.8"));
    assert_eq!(env.get("PATH"), Some("/usr/local/cuda-11.8/bin:/usr/bin:/bin"));
    assert_eq!(
        env.get("LD_LIBRARY_PATH"),
        Some("/usr/local/cuda-11.8/lib64:/usr/lib")
    );
    assert_eq!(report.compilers.cc, Path::new(CC));
    assert_eq!(report.versions.nvcc, NVCC_11_8);
}

#[test]
fn test_without_cuda_root_nvcc_comes_from_path() {
    let (_dir, config) = fixture(None);
    let mut runner = MockRunner::new();
    expect_full_run(&mut runner, &config, true, "nvcc");

    let report = SetupService::new(&runner, &sugarenv_core::NoopEventSink)
        .run(&config, ToolchainEnv::new().with_base("PATH", "/usr/bin"))
        .unwrap();

    assert!(report.cuda.is_none());
    assert_eq!(report.env.get("CUDA_HOME"), None);
    assert_eq!(report.env.get("PATH"), Some("/usr/bin"));
    assert_eq!(report.env.vars().count(), 3);
}

#[test]
fn test_version_checks_see_exported_variables() {
    let (_dir, config) = fixture(Some("/usr/local/cuda-11.8"));
    let mut runner = MockRunner::new();
    let file = config.environment_file.display().to_string();

    runner
        .expect_capture()
        .withf(|cmd, _| cmd.to_string() == "conda env list --json")
        .returning(|_, _| Ok(listing(true)));
    runner
        .expect_run()
        .withf(|_, env| env.is_empty())
        .times(2)
        .returning(|_, _| Ok(()));
    runner
        .expect_capture()
        .withf(|cmd, env| {
            cmd.to_string().contains("which x86_64-conda-linux-gnu-cc") && env.is_empty()
        })
        .returning(|_, _| Ok(format!("{CC}\n")));
    runner
        .expect_capture()
        .withf(|cmd, env| {
            cmd.to_string().contains("which x86_64-conda-linux-gnu-c++") && env.is_empty()
        })
        .returning(|_, _| Ok(format!("{CXX}\n")));
    runner
        .expect_capture()
        .withf(|cmd, env| {
            cmd.arguments() == ["--version".to_string()]
                && env.get("CC") == Some(CC)
                && env.get("CUDA_HOME") == Some("/usr/local/cuda-11.8")
        })
        .times(3)
        .returning(|cmd, _| {
            Ok(if cmd.program().ends_with("nvcc") {
                NVCC_11_8.to_string()
            } else {
                GCC_11.to_string()
            })
        });

    let result = SetupService::new(&runner, &sugarenv_core::NoopEventSink)
        .run(&config, ToolchainEnv::new());
    assert!(result.is_ok(), "setup failed with {file}: {result:?}");
}

#[test]
fn test_failing_update_stops_the_run() {
    let (_dir, config) = fixture(Some("/usr/local/cuda-11.8"));
    let mut runner = MockRunner::new();

    runner
        .expect_capture()
        .withf(|cmd, _| cmd.to_string() == "conda env list --json")
        .times(1)
        .returning(|_, _| Ok(listing(true)));
    runner
        .expect_run()
        .withf(|cmd, _| cmd.to_string().starts_with("conda env update"))
        .times(1)
        .returning(|cmd, _| Err(SetupError::command_failed(cmd, Some(2))));

    let err = SetupService::new(&runner, &sugarenv_core::NoopEventSink)
        .run(&config, ToolchainEnv::new())
        .unwrap_err();

    assert!(matches!(err, SetupError::CommandFailed { code: Some(2), .. }));
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn test_malformed_listing_is_an_error() {
    let (_dir, config) = fixture(None);
    let mut runner = MockRunner::new();
    runner
        .expect_capture()
        .times(1)
        .returning(|_, _| Ok("EnvironmentLocationNotFound".to_string()));

    let err = SetupService::new(&runner, &sugarenv_core::NoopEventSink)
        .run(&config, ToolchainEnv::new())
        .unwrap_err();
    assert!(matches!(err, SetupError::EnvList(_)));
}

#[test]
fn test_missing_environment_file_is_reported_before_running_conda_env() {
    let config = SetupConfig::new("sugar").with_environment_file("/nonexistent/environment.yml");
    let mut runner = MockRunner::new();
    runner
        .expect_capture()
        .times(1)
        .returning(|_, _| Ok(listing(false)));
    runner.expect_run().never();

    let err = SetupService::new(&runner, &sugarenv_core::NoopEventSink)
        .run(&config, ToolchainEnv::new())
        .unwrap_err();
    assert!(matches!(err, SetupError::EnvironmentFileMissing { .. }));
}

#[test]
fn test_invalid_config_runs_nothing() {
    let runner = MockRunner::new();
    let err = SetupService::new(&runner, &sugarenv_core::NoopEventSink)
        .run(&SetupConfig::new("bad name"), ToolchainEnv::new())
        .unwrap_err();
    assert!(matches!(err, SetupError::Validation(_)));
}

#[test]
fn test_empty_which_output_is_an_error() {
    let (_dir, config) = fixture(None);
    let mut runner = MockRunner::new();
    runner
        .expect_capture()
        .withf(|cmd, _| cmd.to_string() == "conda env list --json")
        .returning(|_, _| Ok(listing(true)));
    runner.expect_run().times(2).returning(|_, _| Ok(()));
    runner
        .expect_capture()
        .withf(|cmd, _| cmd.to_string().contains("which"))
        .times(1)
        .returning(|_, _| Ok("\n".to_string()));

    let err = SetupService::new(&runner, &sugarenv_core::NoopEventSink)
        .run(&config, ToolchainEnv::new())
        .unwrap_err();
    assert!(matches!(err, SetupError::EmptyOutput { .. }));
}

#[test]
fn test_which_output_with_activation_noise_uses_last_line() {
    let (_dir, config) = fixture(None);
    let mut runner = MockRunner::new();
    runner
        .expect_capture()
        .withf(|cmd, _| cmd.to_string().contains("which x86_64-conda-linux-gnu-cc"))
        .returning(|_, _| Ok(format!("activating sugar\n{CC}\n\n")));
    runner
        .expect_capture()
        .withf(|cmd, _| cmd.to_string().contains("which x86_64-conda-linux-gnu-c++"))
        .returning(|_, _| Ok(format!("{CXX}\n")));

    let compilers = SetupService::new(&runner, &sugarenv_core::NoopEventSink)
        .discover_host_compilers(&config, &ToolchainEnv::new())
        .unwrap();
    assert_eq!(compilers.cc, PathBuf::from(CC));
    assert_eq!(compilers.cxx, PathBuf::from(CXX));
}

#[test]
fn test_unsupported_host_compiler_is_a_warning() {
    let (_dir, config) = fixture(Some("/usr/local/cuda-11.8"));
    let mut runner = MockRunner::new();
    runner
        .expect_capture()
        .withf(|cmd, _| cmd.to_string() == "conda env list --json")
        .returning(|_, _| Ok(listing(true)));
    runner.expect_run().times(2).returning(|_, _| Ok(()));
    runner
        .expect_capture()
        .withf(|cmd, _| cmd.to_string().contains("which"))
        .times(2)
        .returning(|_, _| Ok("/usr/bin/g++-13\n".to_string()));
    runner
        .expect_capture()
        .withf(|cmd, _| cmd.arguments() == ["--version".to_string()])
        .times(3)
        .returning(|cmd, _| {
            Ok(if cmd.program().ends_with("nvcc") {
                NVCC_11_8.to_string()
            } else {
                "g++ (Ubuntu 13.2.0-4ubuntu3) 13.2.0\n".to_string()
            })
        });

    let sink = RecordingSink::default();
    let report = SetupService::new(&runner, &sink)
        .run(&config, ToolchainEnv::new())
        .unwrap();

    assert_eq!(report.host_compat, HostCompat::Unsupported { max_gcc_major: 11 });
    assert!(sink.events.borrow().contains(&SetupEvent::HostCompilerUnsupported {
        cuda: (11, 8),
        gcc: (13, 2),
        max_gcc_major: 11,
    }));
}
