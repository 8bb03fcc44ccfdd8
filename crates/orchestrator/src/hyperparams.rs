//! Random forest hyperparameter file
//!
//! The training component reads its hyperparameters from a JSON file whose
//! path is passed as `rf_config`.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::error::{OrchestratorError, Result};

/// File name inside the run's working directory
pub const RF_CONFIG_FILE: &str = "rf_config.json";

/// Absolute path of the hyperparameter file for a working directory
pub fn rf_config_path(work_dir: &Path) -> Result<PathBuf> {
    let path = work_dir.join(RF_CONFIG_FILE);
    std::path::absolute(&path).map_err(|e| OrchestratorError::hyperparameter_file(path, e))
}

/// Serialize the hyperparameter mapping, replacing any previous file
pub fn write_rf_config(path: &Path, hyperparameters: &Map<String, Value>) -> Result<()> {
    let body = serde_json::to_vec(hyperparameters)
        .map_err(|e| OrchestratorError::hyperparameter_file(path, e))?;
    std::fs::write(path, body).map_err(|e| OrchestratorError::hyperparameter_file(path, e))?;

    tracing::debug!(
        path = %path.display(),
        keys = hyperparameters.len(),
        "Wrote random forest configuration"
    );
    Ok(())
}

/// Read a hyperparameter file back
pub fn read_rf_config(path: &Path) -> Result<Map<String, Value>> {
    let body =
        std::fs::read(path).map_err(|e| OrchestratorError::hyperparameter_file(path, e))?;
    serde_json::from_slice(&body).map_err(|e| OrchestratorError::hyperparameter_file(path, e))
}
