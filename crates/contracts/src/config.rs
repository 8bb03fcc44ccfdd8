//! PipelineConfig - Config Loader output
//!
//! Hierarchical run configuration: project identity, component location, step
//! selection, ETL sampling and modeling parameters.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

/// Sentinel value of `main.steps` selecting the default step set
pub const ALL_STEPS: &str = "all";

/// Complete run configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PipelineConfig {
    /// Project identity, component location and step selection
    #[validate(nested)]
    pub main: MainConfig,

    /// Data extraction settings
    pub etl: EtlConfig,

    /// Split and training settings
    #[validate(nested)]
    pub modeling: ModelingConfig,
}

/// `main` section
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MainConfig {
    /// Tracking project all runs are logged under
    #[validate(length(min = 1, message = "project_name cannot be empty"))]
    pub project_name: String,

    /// Run group shared by every step of this execution
    #[validate(length(min = 1, message = "experiment_name cannot be empty"))]
    pub experiment_name: String,

    /// Base URL or path the component directories are resolved against
    #[validate(length(min = 1, message = "components_repository cannot be empty"))]
    pub components_repository: String,

    /// Comma separated step names, or `all`
    #[validate(length(min = 1, message = "steps cannot be empty"))]
    pub steps: String,
}

/// `etl` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EtlConfig {
    /// Sample file handed to the download component
    pub sample: String,
}

/// `modeling` section
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ModelingConfig {
    /// Fraction of rows held out for testing
    #[validate(range(
        exclusive_min = 0.0,
        exclusive_max = 1.0,
        message = "test_size must be in (0, 1)"
    ))]
    pub test_size: f64,

    /// Seed forwarded to the split component
    pub random_state: i64,

    /// Random forest hyperparameters, forwarded verbatim
    pub random_forest: Map<String, Value>,
}

impl MainConfig {
    /// Whether the step list is the `all` sentinel
    pub fn selects_all(&self) -> bool {
        self.steps == ALL_STEPS
    }
}
