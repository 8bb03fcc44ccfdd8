//! Step dispatch metrics
//!
//! Recorded through the `metrics` facade. Without an installed recorder the
//! calls are no-ops.

use std::time::Duration;

use metrics::{counter, gauge, histogram};

/// Record a step submission
pub fn record_step_dispatched(step: &str) {
    counter!("pipeline_runner_steps_dispatched_total", "step" => step.to_string()).increment(1);
}

/// Record a finished step (success or failure) and its duration
pub fn record_step_finished(step: &str, success: bool, elapsed: Duration) {
    let status = if success { "success" } else { "failure" };
    counter!(
        "pipeline_runner_steps_finished_total",
        "step" => step.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    histogram!("pipeline_runner_step_duration_seconds", "step" => step.to_string())
        .record(elapsed.as_secs_f64());
}

/// Record the outcome of a whole pipeline run
pub fn record_pipeline_finished(success: bool, steps_completed: usize, elapsed: Duration) {
    let status = if success { "success" } else { "failure" };
    counter!("pipeline_runner_runs_total", "status" => status.to_string()).increment(1);
    gauge!("pipeline_runner_last_run_steps_completed").set(steps_completed as f64);
    histogram!("pipeline_runner_run_duration_seconds").record(elapsed.as_secs_f64());
}
