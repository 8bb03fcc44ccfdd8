//! `mlflow run` command line backend
//!
//! Each invocation becomes one blocking child process:
//! `mlflow run <uri> -e <entry> [-v <version>] [--env-manager <m>] -P k=v ...`

use std::io::ErrorKind;
use std::path::PathBuf;
use std::process::Stdio;

use contracts::{ContractError, RunBackend, RunContext, RunInvocation};
use tokio::process::Command;
use tracing::{debug, info, instrument};

const BACKEND_NAME: &str = "mlflow";

/// Settings for the `mlflow` child processes
#[derive(Debug, Clone)]
pub struct MlflowCliSettings {
    /// Path or name of the `mlflow` executable
    pub executable: PathBuf,

    /// Environment manager passed as `--env-manager` (conda, virtualenv, local)
    pub env_manager: Option<String>,

    /// Extra environment variables for every child
    pub extra_env: Vec<(String, String)>,
}

impl Default for MlflowCliSettings {
    fn default() -> Self {
        Self {
            executable: PathBuf::from("mlflow"),
            env_manager: None,
            extra_env: Vec::new(),
        }
    }
}

/// Backend that shells out to `mlflow run`
#[derive(Debug, Clone, Default)]
pub struct MlflowCliBackend {
    settings: MlflowCliSettings,
}

impl MlflowCliBackend {
    pub fn new(settings: MlflowCliSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &MlflowCliSettings {
        &self.settings
    }

    /// Arguments following the executable for one invocation
    pub fn command_args(&self, invocation: &RunInvocation) -> Vec<String> {
        let mut args = vec![
            "run".to_string(),
            invocation.uri.clone(),
            "-e".to_string(),
            invocation.entry_point.clone(),
        ];

        if let Some(version) = &invocation.version {
            args.push("-v".to_string());
            args.push(version.clone());
        }

        if let Some(env_manager) = &self.settings.env_manager {
            args.push("--env-manager".to_string());
            args.push(env_manager.clone());
        }

        for (key, value) in &invocation.parameters {
            args.push("-P".to_string());
            args.push(format!("{key}={value}"));
        }

        args
    }

    fn build_command(&self, invocation: &RunInvocation, context: &RunContext) -> Command {
        let mut cmd = Command::new(&self.settings.executable);
        cmd.args(self.command_args(invocation));
        cmd.env("TMPDIR", &context.scratch_dir);
        for (key, value) in &self.settings.extra_env {
            cmd.env(key, value);
        }
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::inherit());
        cmd.stderr(Stdio::inherit());
        // Dropping the submit future (shutdown) must not orphan the child
        cmd.kill_on_drop(true);
        cmd
    }
}

impl RunBackend for MlflowCliBackend {
    fn name(&self) -> &str {
        BACKEND_NAME
    }

    #[instrument(
        name = "mlflow_submit",
        skip(self, invocation, context),
        fields(step = %invocation.step, uri = %invocation.uri)
    )]
    async fn submit(
        &self,
        invocation: &RunInvocation,
        context: &RunContext,
    ) -> Result<(), ContractError> {
        debug!(
            executable = %self.settings.executable.display(),
            args = ?self.command_args(invocation),
            "Spawning mlflow run"
        );

        let status = self
            .build_command(invocation, context)
            .status()
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => ContractError::backend_unavailable(
                    BACKEND_NAME,
                    format!(
                        "executable '{}' not found",
                        self.settings.executable.display()
                    ),
                ),
                _ => ContractError::Io(e),
            })?;

        if status.success() {
            info!("mlflow run finished");
            Ok(())
        } else {
            Err(ContractError::run_failed(
                invocation.step.clone(),
                status.code(),
                "mlflow run exited unsuccessfully",
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invocation() -> RunInvocation {
        RunInvocation::new("download", "https://example.com/components/get_data")
            .with_version("main")
            .with_param("sample", "sample1.csv")
            .with_param("artifact_name", "sample.csv")
    }

    fn context() -> (tempfile::TempDir, RunContext) {
        let dir = tempfile::tempdir().unwrap();
        let context = RunContext {
            scratch_dir: dir.path().to_path_buf(),
        };
        (dir, context)
    }

    #[test]
    fn test_command_args() {
        let backend = MlflowCliBackend::default();
        let args = backend.command_args(&invocation());
        assert_eq!(
            args,
            vec![
                "run",
                "https://example.com/components/get_data",
                "-e",
                "main",
                "-v",
                "main",
                "-P",
                "artifact_name=sample.csv",
                "-P",
                "sample=sample1.csv",
            ]
        );
    }

    #[test]
    fn test_command_args_with_env_manager() {
        let backend = MlflowCliBackend::new(MlflowCliSettings {
            env_manager: Some("local".into()),
            ..Default::default()
        });
        let inv = RunInvocation::new("basic_cleaning", "./components/basic_cleaning");
        let args = backend.command_args(&inv);
        assert!(!args.contains(&"-v".to_string()));
        assert_eq!(&args[4..6], &["--env-manager", "local"]);
    }

    #[tokio::test]
    async fn test_missing_executable() {
        let backend = MlflowCliBackend::new(MlflowCliSettings {
            executable: PathBuf::from("/nonexistent/bin/mlflow"),
            ..Default::default()
        });
        let (_dir, ctx) = context();
        let result = backend.submit(&invocation(), &ctx).await;
        assert!(matches!(
            result,
            Err(ContractError::BackendUnavailable { .. })
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_exit_status_mapping() {
        let (_dir, ctx) = context();

        let ok = MlflowCliBackend::new(MlflowCliSettings {
            executable: PathBuf::from("true"),
            ..Default::default()
        });
        assert!(ok.submit(&invocation(), &ctx).await.is_ok());

        let failing = MlflowCliBackend::new(MlflowCliSettings {
            executable: PathBuf::from("false"),
            ..Default::default()
        });
        match failing.submit(&invocation(), &ctx).await {
            Err(ContractError::RunFailed {
                step, exit_code, ..
            }) => {
                assert_eq!(step, "download");
                assert_eq!(exit_code, Some(1));
            }
            other => panic!("expected RunFailed, got {other:?}"),
        }
    }
}
