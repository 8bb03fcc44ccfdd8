//! Command implementations.

mod info;
mod run;
mod validate;

use std::path::Path;

use contracts::PipelineConfig;
use tracing::info;

use crate::error::{CliError, Result};

pub use info::run_info;
pub use run::run_pipeline;
pub use validate::run_validate;

/// Load configuration and apply command-line overrides
fn load_config(path: &Path, overrides: &[String]) -> Result<PipelineConfig> {
    if !path.exists() {
        return Err(CliError::config_not_found(path));
    }

    if !overrides.is_empty() {
        info!(count = overrides.len(), "Applying configuration overrides");
    }

    config_loader::ConfigLoader::load_from_path(path, overrides)
        .map_err(|e| CliError::config_load(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"
main:
  project_name: nyc_airbnb
  experiment_name: development
  components_repository: https://example.com/components
  steps: all
etl:
  sample: sample1.csv
modeling:
  test_size: 0.2
  random_state: 42
  random_forest:
    n_estimators: 100
"#;

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(&dir.path().join("config.yaml"), &[]).unwrap_err();
        assert!(matches!(err, CliError::ConfigNotFound { .. }));
    }

    #[test]
    fn test_overrides_applied() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, CONFIG).unwrap();

        let config = load_config(&path, &["main.steps=download".to_string()]).unwrap();
        assert_eq!(config.main.steps, "download");
    }

    #[test]
    fn test_invalid_override_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, CONFIG).unwrap();

        let err = load_config(&path, &["modeling.test_size=1.5".to_string()]).unwrap_err();
        assert!(matches!(err, CliError::ConfigLoad { .. }));
        assert!(err.to_string().contains("config.yaml"));
    }
}
