//! Tracking backend environment
//!
//! Every external run reads these variables, so all runs of one execution are
//! grouped under the same project and run group.

use contracts::PipelineConfig;

pub const PROJECT_VAR: &str = "WANDB_PROJECT";
pub const RUN_GROUP_VAR: &str = "WANDB_RUN_GROUP";

/// Project and run group exported to the process environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackingEnvironment {
    pub project: String,
    pub run_group: String,
}

impl TrackingEnvironment {
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            project: config.main.project_name.clone(),
            run_group: config.main.experiment_name.clone(),
        }
    }

    /// `(name, value)` pairs
    pub fn vars(&self) -> [(&'static str, &str); 2] {
        [
            (PROJECT_VAR, self.project.as_str()),
            (RUN_GROUP_VAR, self.run_group.as_str()),
        ]
    }

    /// Export into the process environment; children inherit it
    pub fn apply(&self) {
        for (key, value) in self.vars() {
            std::env::set_var(key, value);
        }
        tracing::info!(
            project = %self.project,
            run_group = %self.run_group,
            "Tracking environment exported"
        );
    }
}
