//! `run` command implementation.

use std::future::Future;

use anyhow::{Context, Result};
use tracing::{info, warn};

use contracts::{PipelineConfig, RunBackend};
use orchestrator::{Orchestrator, OrchestratorOptions, RunReport};
use run_backend::{MlflowCliBackend, MlflowCliSettings};

use super::load_config;
use crate::cli::RunArgs;
use crate::error::CliError;

/// Execute the `run` command
pub async fn run_pipeline(args: &RunArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration");

    let config = load_config(&args.config, &args.overrides)?;

    info!(
        project = %config.main.project_name,
        experiment = %config.main.experiment_name,
        repository = %config.main.components_repository,
        steps = %config.main.steps,
        "Configuration loaded"
    );

    let options = match &args.work_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create work dir {}", dir.display()))?;
            OrchestratorOptions::with_work_dir(dir)
        }
        None => OrchestratorOptions::from_current_dir().map_err(CliError::from)?,
    };

    let backend = MlflowCliBackend::new(MlflowCliSettings {
        executable: args.mlflow_bin.clone(),
        env_manager: args.env_manager.clone(),
        ..Default::default()
    });
    let orchestrator = Orchestrator::new(backend, options);

    // Dry run - print the plan and exit
    if args.dry_run {
        info!("Dry run mode - no step will be dispatched");
        let plan = orchestrator.plan(&config).map_err(CliError::from)?;
        println!("\n=== Dispatch Plan ({} steps) ===\n", plan.len());
        for (i, invocation) in plan.iter().enumerate() {
            let argv = orchestrator.backend().command_args(invocation);
            println!(
                "{}. {}\n   {} {}",
                i + 1,
                invocation.step,
                orchestrator.backend().settings().executable.display(),
                argv.join(" ")
            );
        }
        println!();
        return Ok(());
    }

    if args.metrics_port != 0 {
        observability::init_metrics_only(args.metrics_port)?;
    }

    let shutdown_signal = setup_shutdown_signal();

    info!("Starting pipeline...");
    let report = run_until_shutdown(&orchestrator, &config, shutdown_signal).await?;

    info!(
        steps = report.steps.len(),
        duration_secs = report.duration.as_secs_f64(),
        "Pipeline completed successfully"
    );
    report.print_summary();

    Ok(())
}

/// Run the pipeline unless `shutdown` resolves first
///
/// On shutdown the run future is dropped: the scratch directory is removed
/// and a running child process is killed.
async fn run_until_shutdown<B, S>(
    orchestrator: &Orchestrator<B>,
    config: &PipelineConfig,
    shutdown: S,
) -> std::result::Result<RunReport, CliError>
where
    B: RunBackend,
    S: Future<Output = &'static str>,
{
    tokio::select! {
        result = orchestrator.run(config) => Ok(result?),
        signal = shutdown => {
            warn!(signal, "Received shutdown signal, stopping pipeline...");
            Err(CliError::Interrupted { signal })
        }
    }
}

/// Resolves with the name of the first termination signal received
async fn setup_shutdown_signal() -> &'static str {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => "SIGINT",
            Err(e) => {
                warn!(error = %e, "Failed to install Ctrl+C handler");
                std::future::pending().await
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                "SIGTERM"
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending().await
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<&'static str>();

    tokio::select! {
        signal = ctrl_c => signal,
        signal = terminate => signal,
    }
}
