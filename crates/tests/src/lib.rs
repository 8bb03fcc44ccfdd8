//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 配置文件 → 覆盖 → 调度 的完整链路
//! - 模拟后端 e2e 测试（无需 mlflow）
//! - 真实子进程后端的失败传播

#[cfg(test)]
mod contract_tests {
    use contracts::{ArtifactRef, RunInvocation, DEFAULT_ENTRY_POINT};

    #[test]
    fn test_invocation_defaults() {
        let invocation = RunInvocation::new("download", "repo/get_data");
        assert_eq!(invocation.entry_point, DEFAULT_ENTRY_POINT);
        assert!(invocation.version.is_none());
        assert!(invocation.parameters.is_empty());
    }

    #[test]
    fn test_artifact_reference_format() {
        assert_eq!(ArtifactRef::prod("random_forest.pkl").to_string(), "random_forest.pkl:prod");
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::path::PathBuf;

    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::{ParamValue, PipelineConfig};
    use orchestrator::hyperparams::{read_rf_config, RF_CONFIG_FILE};
    use orchestrator::tracking::{PROJECT_VAR, RUN_GROUP_VAR};
    use orchestrator::{leftover_scratch_dirs, Orchestrator, OrchestratorError, OrchestratorOptions};
    use run_backend::{MockBackendConfig, MockRunBackend};

    const CONFIG_YAML: &str = r#"
main:
  project_name: nyc_airbnb
  experiment_name: development
  components_repository: https://github.com/example/ml-pipeline-components#components
  steps: all
etl:
  sample: sample1.csv
  min_price: 10
  max_price: 350
modeling:
  test_size: 0.2
  val_size: 0.2
  random_seed: 42
  random_state: 42
  stratify_by: neighbourhood_group
  max_tfidf_features: 5
  random_forest:
    n_estimators: 100
    max_depth: 15
    min_samples_split: 4
    min_samples_leaf: 3
    n_jobs: -1
    criterion: mae
    max_features: 0.5
    oob_score: true
"#;

    /// 单个场景的工作目录与临时目录父目录
    struct Workspace {
        work: tempfile::TempDir,
        scratch: tempfile::TempDir,
    }

    impl Workspace {
        fn new() -> Self {
            Self {
                work: tempfile::tempdir().unwrap(),
                scratch: tempfile::tempdir().unwrap(),
            }
        }

        fn options(&self) -> OrchestratorOptions {
            OrchestratorOptions {
                work_dir: self.work.path().to_path_buf(),
                scratch_parent: Some(self.scratch.path().to_path_buf()),
            }
        }

        fn rf_config(&self) -> PathBuf {
            self.work.path().join(RF_CONFIG_FILE)
        }

        fn write_config(&self, name: &str, content: &str) -> PathBuf {
            let path = self.work.path().join(name);
            std::fs::write(&path, content).unwrap();
            path
        }
    }

    fn load(steps: &str) -> PipelineConfig {
        ConfigLoader::load_from_str(
            CONFIG_YAML,
            ConfigFormat::Yaml,
            &[format!("main.steps={steps}")],
        )
        .unwrap()
    }

    fn recording_backend() -> MockRunBackend {
        MockRunBackend::with_config(MockBackendConfig {
            watch_env: vec![PROJECT_VAR.into(), RUN_GROUP_VAR.into()],
            ..Default::default()
        })
    }

    /// 端到端：配置文件 → 覆盖 → 编排器 → 后端
    #[tokio::test]
    async fn test_e2e_config_file_to_dispatch() {
        let ws = Workspace::new();
        let path = ws.write_config("config.yaml", CONFIG_YAML);
        let config = ConfigLoader::load_from_path(
            &path,
            &["main.steps=download,basic_cleaning".to_string()],
        )
        .unwrap();

        let orchestrator = Orchestrator::new(recording_backend(), ws.options());
        let report = orchestrator.run(&config).await.unwrap();

        assert_eq!(report.dispatched_steps(), vec!["download", "basic_cleaning"]);
        assert!(!ws.rf_config().exists());

        let runs = orchestrator.backend().runs();
        assert_eq!(
            runs[0].invocation.uri,
            "https://github.com/example/ml-pipeline-components#components/get_data"
        );
        assert_eq!(runs[0].invocation.version.as_deref(), Some("main"));
        assert_eq!(
            runs[1].invocation.param("input_artifact"),
            Some(&ParamValue::Text("sample.csv:latest".into()))
        );
    }

    #[tokio::test]
    async fn test_e2e_all_steps_in_order() {
        let ws = Workspace::new();
        let orchestrator = Orchestrator::new(recording_backend(), ws.options());

        let report = orchestrator.run(&load("all")).await.unwrap();

        assert_eq!(
            orchestrator.backend().submitted_steps(),
            vec![
                "download",
                "basic_cleaning",
                "data_check",
                "data_split",
                "train_random_forest"
            ]
        );
        assert_eq!(report.skipped, vec!["test_regression_model"]);
        assert!(ws.rf_config().is_file());
    }

    #[tokio::test]
    async fn test_e2e_tracking_env_visible_to_first_run() {
        let ws = Workspace::new();
        let orchestrator = Orchestrator::new(recording_backend(), ws.options());

        orchestrator.run(&load("download")).await.unwrap();

        let runs = orchestrator.backend().runs();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].env[PROJECT_VAR].as_deref(), Some("nyc_airbnb"));
        assert_eq!(runs[0].env[RUN_GROUP_VAR].as_deref(), Some("development"));
    }

    #[tokio::test]
    async fn test_e2e_training_reads_hyperparameters_from_file() {
        let ws = Workspace::new();
        let config = ConfigLoader::load_from_str(
            CONFIG_YAML,
            ConfigFormat::Yaml,
            &[
                "main.steps=train_random_forest".to_string(),
                "modeling.random_forest.max_depth=20".to_string(),
                "+modeling.random_forest.max_samples=0.8".to_string(),
            ],
        )
        .unwrap();

        let orchestrator = Orchestrator::new(recording_backend(), ws.options());
        orchestrator.run(&config).await.unwrap();

        let runs = orchestrator.backend().runs();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].path_params.get("rf_config"), Some(&true));
        match runs[0].invocation.param("rf_config") {
            Some(ParamValue::Path(path)) => assert!(path.is_absolute()),
            other => panic!("expected a path parameter, got {other:?}"),
        }

        let written = read_rf_config(&ws.rf_config()).unwrap();
        assert_eq!(written, config.modeling.random_forest);
        assert_eq!(written["max_depth"], serde_json::json!(20));
        assert_eq!(written["max_samples"], serde_json::json!(0.8));
    }

    #[tokio::test]
    async fn test_e2e_failure_in_cleaning_stops_pipeline() {
        let ws = Workspace::new();
        let backend = MockRunBackend::with_config(MockBackendConfig {
            fail_steps: vec!["basic_cleaning".into()],
            ..Default::default()
        });
        let orchestrator = Orchestrator::new(backend, ws.options());

        let err = orchestrator.run(&load("all")).await.unwrap_err();

        assert!(matches!(
            err,
            OrchestratorError::StepFailed { ref step, .. } if step == "basic_cleaning"
        ));
        assert_eq!(
            orchestrator.backend().submitted_steps(),
            vec!["download", "basic_cleaning"]
        );
        assert!(!ws.rf_config().exists());
        assert!(leftover_scratch_dirs(ws.scratch.path()).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_e2e_dry_run_plan_equals_submissions() {
        let ws = Workspace::new();
        let orchestrator = Orchestrator::new(recording_backend(), ws.options());
        let config = load("all");

        let plan = orchestrator.plan(&config).unwrap();
        assert_eq!(plan.len(), 5);
        assert_eq!(orchestrator.backend().run_count(), 0);

        orchestrator.run(&config).await.unwrap();
        let submitted: Vec<_> = orchestrator
            .backend()
            .runs()
            .into_iter()
            .map(|run| run.invocation)
            .collect();
        assert_eq!(plan, submitted);
    }

    #[test]
    fn test_e2e_toml_and_yaml_agree() {
        let ws = Workspace::new();
        let toml_path = ws.write_config(
            "config.toml",
            r#"
[main]
project_name = "nyc_airbnb"
experiment_name = "development"
components_repository = "https://github.com/example/ml-pipeline-components#components"
steps = "all"

[etl]
sample = "sample1.csv"

[modeling]
test_size = 0.2
random_state = 42

[modeling.random_forest]
n_estimators = 100
max_depth = 15
"#,
        );
        let from_toml = ConfigLoader::load_from_path(&toml_path, &[]).unwrap();
        let from_yaml = load("all");

        let orchestrator = Orchestrator::new(MockRunBackend::new(), ws.options());
        let toml_plan = orchestrator.plan(&from_toml).unwrap();
        let yaml_plan = orchestrator.plan(&from_yaml).unwrap();

        let steps = |plan: &[contracts::RunInvocation]| -> Vec<String> {
            plan.iter().map(|inv| inv.step.clone()).collect()
        };
        assert_eq!(steps(&toml_plan), steps(&yaml_plan));
        assert_eq!(toml_plan[3].parameters, yaml_plan[3].parameters);
    }

    #[test]
    fn test_e2e_invalid_override_rejected_before_dispatch() {
        let err = ConfigLoader::load_from_str(
            CONFIG_YAML,
            ConfigFormat::Yaml,
            &["modeling.random_forest.max_leaf_nodes=10".to_string()],
        )
        .unwrap_err();
        assert!(matches!(err, contracts::ContractError::ConfigOverride { .. }));
    }

    /// 真实子进程：用 `true` / `false` 代替 mlflow 可执行文件
    #[cfg(unix)]
    mod subprocess {
        use super::*;
        use contracts::ContractError;
        use run_backend::{MlflowCliBackend, MlflowCliSettings};

        fn backend(executable: &str) -> MlflowCliBackend {
            MlflowCliBackend::new(MlflowCliSettings {
                executable: PathBuf::from(executable),
                ..Default::default()
            })
        }

        #[tokio::test]
        async fn test_e2e_subprocess_success() {
            let ws = Workspace::new();
            let orchestrator = Orchestrator::new(backend("true"), ws.options());

            let report = orchestrator
                .run(&load("download,data_split"))
                .await
                .unwrap();

            assert_eq!(report.dispatched_steps(), vec!["download", "data_split"]);
            assert!(leftover_scratch_dirs(ws.scratch.path()).unwrap().is_empty());
        }

        #[tokio::test]
        async fn test_e2e_subprocess_failure_carries_exit_code() {
            let ws = Workspace::new();
            let orchestrator = Orchestrator::new(backend("false"), ws.options());

            let err = orchestrator.run(&load("all")).await.unwrap_err();

            match err {
                OrchestratorError::StepFailed { step, source } => {
                    assert_eq!(step, "download");
                    assert!(matches!(
                        source,
                        ContractError::RunFailed {
                            exit_code: Some(1),
                            ..
                        }
                    ));
                }
                other => panic!("expected StepFailed, got {other:?}"),
            }
            assert!(leftover_scratch_dirs(ws.scratch.path()).unwrap().is_empty());
        }

        #[tokio::test]
        async fn test_e2e_missing_executable() {
            let ws = Workspace::new();
            let missing = ws.work.path().join("no-such-mlflow");
            let orchestrator = Orchestrator::new(
                backend(missing.to_str().unwrap()),
                ws.options(),
            );

            let err = orchestrator.run(&load("download")).await.unwrap_err();
            assert!(matches!(
                err,
                OrchestratorError::StepFailed {
                    source: ContractError::BackendUnavailable { .. },
                    ..
                }
            ));
        }
    }
}
