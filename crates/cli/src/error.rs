//! Error types for CLI operations.

use std::path::{Path, PathBuf};

use contracts::ContractError;
use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file not found
    #[error("Configuration file not found: {}", path.display())]
    ConfigNotFound { path: PathBuf },

    /// Configuration could not be loaded (parse, override or validation failure)
    #[error("Failed to load config from {}: {source}", path.display())]
    ConfigLoad {
        path: PathBuf,
        #[source]
        source: ContractError,
    },

    /// Pipeline execution error
    #[error("Pipeline execution failed: {0}")]
    PipelineExecution(#[from] orchestrator::OrchestratorError),

    /// Run stopped by a shutdown signal
    #[error("Pipeline interrupted by {signal}")]
    Interrupted { signal: &'static str },
}

impl CliError {
    pub fn config_not_found(path: impl Into<PathBuf>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    pub fn config_load(path: &Path, source: ContractError) -> Self {
        Self::ConfigLoad {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
