//! Pipeline orchestrator - dispatches the selected steps in pipeline order.
//!
//! One step at a time: each submission is awaited before the next step is
//! considered. The first failure ends the run.

use std::path::{Path, PathBuf};
use std::time::Instant;

use contracts::{PipelineConfig, RunBackend, RunContext, RunInvocation};
use tempfile::TempDir;
use tracing::{debug, error, info, warn};

use crate::error::{OrchestratorError, Result};
use crate::hyperparams;
use crate::report::{RunReport, StepRecord};
use crate::selection::StepSelection;
use crate::steps::{ExtraParams, StepRegistry};
use crate::tracking::TrackingEnvironment;

const SCRATCH_PREFIX: &str = "pipeline-run-";

/// Orchestrator options
#[derive(Debug, Clone)]
pub struct OrchestratorOptions {
    /// Directory the hyperparameter file is written to
    pub work_dir: PathBuf,

    /// Parent of the per-run scratch directory (None = system temp dir)
    pub scratch_parent: Option<PathBuf>,
}

impl OrchestratorOptions {
    /// Options rooted at the process working directory
    pub fn from_current_dir() -> Result<Self> {
        let work_dir = std::env::current_dir().map_err(OrchestratorError::Scratch)?;
        Ok(Self {
            work_dir,
            scratch_parent: None,
        })
    }

    pub fn with_work_dir(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
            scratch_parent: None,
        }
    }
}

/// Main pipeline orchestrator
pub struct Orchestrator<B> {
    backend: B,
    registry: StepRegistry,
    options: OrchestratorOptions,
}

impl<B: RunBackend> Orchestrator<B> {
    /// Create an orchestrator over the canonical step table
    pub fn new(backend: B, options: OrchestratorOptions) -> Self {
        Self {
            backend,
            registry: StepRegistry::canonical(),
            options,
        }
    }

    /// Replace the step table
    pub fn with_registry(mut self, registry: StepRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn registry(&self) -> &StepRegistry {
        &self.registry
    }

    pub fn options(&self) -> &OrchestratorOptions {
        &self.options
    }

    /// Invocations `run` would submit, without side effects
    pub fn plan(&self, config: &PipelineConfig) -> Result<Vec<RunInvocation>> {
        plan(&self.registry, config, &self.options.work_dir)
    }

    /// Run the selected steps to completion
    ///
    /// # Errors
    /// - Broken artifact chain in the step table
    /// - Scratch directory or hyperparameter file I/O failure
    /// - The first failed external run; later steps are not dispatched
    pub async fn run(&self, config: &PipelineConfig) -> Result<RunReport> {
        let start_time = Instant::now();
        let tracking = TrackingEnvironment::from_config(config);
        let mut report = RunReport::new(&tracking.project, &tracking.run_group);

        if let Err(e) = self.execute(config, &tracking, &mut report).await {
            observability::record_pipeline_finished(
                false,
                report.steps.len(),
                start_time.elapsed(),
            );
            return Err(e);
        }

        report.duration = start_time.elapsed();
        observability::record_pipeline_finished(true, report.steps.len(), report.duration);
        info!(
            steps = report.steps.len(),
            duration_secs = report.duration.as_secs_f64(),
            "Pipeline completed"
        );

        Ok(report)
    }

    async fn execute(
        &self,
        config: &PipelineConfig,
        tracking: &TrackingEnvironment,
        report: &mut RunReport,
    ) -> Result<()> {
        self.registry.check_artifact_chain()?;

        let selection = StepSelection::parse(&config.main.steps);
        for entry in StepSelection::padded_entries(&config.main.steps) {
            warn!(entry = %entry, "Step name has surrounding whitespace, trimmed");
        }
        report.unknown_steps = selection.unknown_names(&self.registry);
        for name in &report.unknown_steps {
            warn!(step = %name, "Selected step is not part of the pipeline, ignoring");
        }

        tracking.apply();

        let scratch = self.create_scratch_dir()?;
        let context = RunContext {
            scratch_dir: scratch.path().to_path_buf(),
        };
        debug!(scratch = %context.scratch_dir.display(), "Scratch directory ready");

        let rf_config_path = hyperparams::rf_config_path(&self.options.work_dir)?;

        info!(
            backend = self.backend.name(),
            steps = ?selection.active_names(&self.registry),
            "Starting pipeline"
        );

        for step in self.registry.iter() {
            if !selection.contains(&self.registry, step.name) {
                debug!(step = step.name, "Step not selected, skipping");
                report.skipped.push(step.name.to_string());
                continue;
            }

            if step.extra == ExtraParams::RandomForestConfig {
                hyperparams::write_rf_config(&rf_config_path, &config.modeling.random_forest)?;
                report.rf_config_path = Some(rf_config_path.clone());
            }

            let invocation = step.build_invocation(config, &rf_config_path);
            let record = self.dispatch(&invocation, &context).await?;
            report.steps.push(record);
        }

        scratch.close().map_err(OrchestratorError::Scratch)
    }

    async fn dispatch(
        &self,
        invocation: &RunInvocation,
        context: &RunContext,
    ) -> Result<StepRecord> {
        info!(
            step = %invocation.step,
            uri = %invocation.uri,
            entry_point = %invocation.entry_point,
            version = ?invocation.version,
            "Dispatching step"
        );
        debug!(step = %invocation.step, parameters = ?invocation.parameters, "Step parameters");
        observability::record_step_dispatched(&invocation.step);

        let started = Instant::now();
        let result = self.backend.submit(invocation, context).await;
        let elapsed = started.elapsed();
        observability::record_step_finished(&invocation.step, result.is_ok(), elapsed);

        match result {
            Ok(()) => {
                info!(
                    step = %invocation.step,
                    duration_secs = elapsed.as_secs_f64(),
                    "Step completed"
                );
                Ok(StepRecord {
                    step: invocation.step.clone(),
                    uri: invocation.uri.clone(),
                    duration: elapsed,
                })
            }
            Err(e) => {
                error!(step = %invocation.step, error = %e, "Step failed, aborting pipeline");
                Err(OrchestratorError::step_failed(invocation.step.clone(), e))
            }
        }
    }

    fn create_scratch_dir(&self) -> Result<TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(SCRATCH_PREFIX);
        match self.options.scratch_parent.as_deref() {
            Some(parent) => builder.tempdir_in(parent),
            None => builder.tempdir(),
        }
        .map_err(OrchestratorError::Scratch)
    }
}

/// Invocations a run over `registry` would submit
///
/// Touches neither the environment, the filesystem nor any backend.
pub fn plan(
    registry: &StepRegistry,
    config: &PipelineConfig,
    work_dir: &Path,
) -> Result<Vec<RunInvocation>> {
    registry.check_artifact_chain()?;
    let selection = StepSelection::parse(&config.main.steps);
    let rf_config_path = hyperparams::rf_config_path(work_dir)?;

    Ok(registry
        .iter()
        .filter(|step| selection.contains(registry, step.name))
        .map(|step| step.build_invocation(config, &rf_config_path))
        .collect())
}

/// Scratch directories under `parent` left by this orchestrator
pub fn leftover_scratch_dirs(parent: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for entry in std::fs::read_dir(parent)? {
        let entry = entry?;
        if entry
            .file_name()
            .to_string_lossy()
            .starts_with(SCRATCH_PREFIX)
        {
            found.push(entry.path());
        }
    }
    Ok(found)
}
