//! Mock run backend
//!
//! Records every submitted invocation. Supports injected failures.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Mutex;

use contracts::{ContractError, ParamValue, RunBackend, RunContext, RunInvocation};
use tracing::instrument;

/// Mock backend configuration
#[derive(Debug, Default, Clone)]
pub struct MockBackendConfig {
    /// Steps whose submission should fail
    pub fail_steps: Vec<String>,
    /// Environment variables to snapshot at submit time
    pub watch_env: Vec<String>,
}

/// One recorded submission
#[derive(Debug, Clone)]
pub struct RecordedRun {
    /// The invocation as submitted
    pub invocation: RunInvocation,
    /// Scratch directory handed to the run
    pub scratch_dir: PathBuf,
    /// Whether the scratch directory existed at submit time
    pub scratch_existed: bool,
    /// Watched environment variables at submit time
    pub env: BTreeMap<String, Option<String>>,
    /// Path-valued parameters and whether the file existed at submit time
    pub path_params: BTreeMap<String, bool>,
}

/// Mock run backend
#[derive(Debug, Default)]
pub struct MockRunBackend {
    config: MockBackendConfig,
    runs: Mutex<Vec<RecordedRun>>,
}

impl MockRunBackend {
    /// Mock backend that accepts every run
    pub fn new() -> Self {
        Self::with_config(MockBackendConfig::default())
    }

    /// Mock backend with explicit configuration
    pub fn with_config(config: MockBackendConfig) -> Self {
        Self {
            config,
            runs: Mutex::new(Vec::new()),
        }
    }

    /// Backend that fails the given step
    pub fn failing_on(step: impl Into<String>) -> Self {
        Self::with_config(MockBackendConfig {
            fail_steps: vec![step.into()],
            ..Default::default()
        })
    }

    /// All recorded submissions, in order
    pub fn runs(&self) -> Vec<RecordedRun> {
        self.runs.lock().unwrap().clone()
    }

    /// Step names of recorded submissions, in order
    pub fn submitted_steps(&self) -> Vec<String> {
        self.runs
            .lock()
            .unwrap()
            .iter()
            .map(|run| run.invocation.step.clone())
            .collect()
    }

    /// Number of recorded submissions
    pub fn run_count(&self) -> usize {
        self.runs.lock().unwrap().len()
    }

    fn record(&self, invocation: &RunInvocation, context: &RunContext) {
        let env = self
            .config
            .watch_env
            .iter()
            .map(|key| (key.clone(), std::env::var(key).ok()))
            .collect();

        let path_params = invocation
            .parameters
            .iter()
            .filter_map(|(key, value)| match value {
                ParamValue::Path(path) => Some((key.clone(), path.is_file())),
                _ => None,
            })
            .collect();

        self.runs.lock().unwrap().push(RecordedRun {
            invocation: invocation.clone(),
            scratch_dir: context.scratch_dir.clone(),
            scratch_existed: context.scratch_dir.is_dir(),
            env,
            path_params,
        });
    }
}

impl RunBackend for MockRunBackend {
    fn name(&self) -> &str {
        "mock"
    }

    #[instrument(name = "mock_submit", skip(self, invocation, context), fields(step = %invocation.step))]
    async fn submit(
        &self,
        invocation: &RunInvocation,
        context: &RunContext,
    ) -> Result<(), ContractError> {
        self.record(invocation, context);

        if self.config.fail_steps.contains(&invocation.step) {
            return Err(ContractError::run_failed(
                invocation.step.clone(),
                Some(1),
                "mock failure",
            ));
        }
        Ok(())
    }
}
