//! Orchestrator error types

use std::path::PathBuf;

use contracts::ContractError;
use thiserror::Error;

/// Orchestrator specific error
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// External run for a step failed; later steps were not dispatched
    #[error("step '{step}' failed: {source}")]
    StepFailed {
        step: String,
        #[source]
        source: ContractError,
    },

    /// A step consumes an artifact no earlier step declares
    #[error("artifact chain broken: step '{step}' consumes '{artifact}' which no earlier step produces")]
    BrokenArtifactChain { step: String, artifact: String },

    /// Hyperparameter file could not be written
    #[error("failed to write hyperparameter file {}: {source}", path.display())]
    HyperparameterFile {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Scratch directory could not be created or removed
    #[error("scratch directory error: {0}")]
    Scratch(#[source] std::io::Error),

    /// Wrapped ContractError
    #[error(transparent)]
    Contract(#[from] ContractError),
}

impl OrchestratorError {
    /// Create step failure
    pub fn step_failed(step: impl Into<String>, source: ContractError) -> Self {
        Self::StepFailed {
            step: step.into(),
            source,
        }
    }

    /// Create hyperparameter file error
    pub fn hyperparameter_file(
        path: impl Into<PathBuf>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::HyperparameterFile {
            path: path.into(),
            source: source.into(),
        }
    }
}

/// Result alias
pub type Result<T> = std::result::Result<T, OrchestratorError>;
