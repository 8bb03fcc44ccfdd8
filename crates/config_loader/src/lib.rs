//! # Config Loader
//!
//! Configuration loading and parsing module.
//!
//! Responsibilities:
//! - Parse YAML/TOML/JSON configuration files
//! - Apply `key.path=value` command line overrides
//! - Validate configuration legality
//! - Generate `PipelineConfig`
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let overrides = vec!["main.steps=download".to_string()];
//! let config = ConfigLoader::load_from_path(Path::new("config.yaml"), &overrides).unwrap();
//! println!("Project: {}", config.main.project_name);
//! ```

mod overrides;
mod parser;
mod validator;

pub use contracts::PipelineConfig;
pub use overrides::Override;
pub use parser::ConfigFormat;

use contracts::ContractError;
use std::path::Path;

/// Configuration loader
///
/// Provides static methods to load configuration from files or strings.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from file path
    ///
    /// Automatically detects format from file extension (.yaml / .toml / .json).
    ///
    /// # Errors
    /// - File read failure
    /// - Unsupported format
    /// - Parse failure or missing key
    /// - Override failure
    /// - Validation failure
    pub fn load_from_path(
        path: &Path,
        overrides: &[String],
    ) -> Result<PipelineConfig, ContractError> {
        let format = Self::detect_format(path)?;
        let content = Self::read_file(path)?;
        Self::load_from_str(&content, format, overrides)
    }

    /// Load configuration from string
    ///
    /// # Errors
    /// - Parse failure or missing key
    /// - Override failure
    /// - Validation failure
    pub fn load_from_str(
        content: &str,
        format: ConfigFormat,
        overrides: &[String],
    ) -> Result<PipelineConfig, ContractError> {
        let mut document = parser::parse_document(content, format)?;
        overrides::apply_all(&mut document, overrides)?;
        let config = parser::into_config(document)?;
        validator::validate(&config)?;
        Ok(config)
    }

    /// Serialize PipelineConfig to YAML string
    pub fn to_yaml(config: &PipelineConfig) -> Result<String, ContractError> {
        serde_yaml::to_string(config)
            .map_err(|e| ContractError::config_parse(format!("YAML serialize error: {e}")))
    }

    /// Serialize PipelineConfig to JSON string
    pub fn to_json(config: &PipelineConfig) -> Result<String, ContractError> {
        serde_json::to_string_pretty(config)
            .map_err(|e| ContractError::config_parse(format!("JSON serialize error: {e}")))
    }
}

impl ConfigLoader {
    /// Infer configuration format from file extension
    fn detect_format(path: &Path) -> Result<ConfigFormat, ContractError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            ContractError::config_parse("cannot determine file format from extension")
        })?;

        ConfigFormat::from_extension(ext).ok_or_else(|| {
            ContractError::config_parse(format!("unsupported config format: .{ext}"))
        })
    }

    /// Read configuration file content
    fn read_file(path: &Path) -> Result<String, ContractError> {
        Ok(std::fs::read_to_string(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL_YAML: &str = r#"
main:
  project_name: nyc_airbnb
  experiment_name: development
  components_repository: https://github.com/example/ml-components
  steps: all
etl:
  sample: sample1.csv
  min_price: 10
modeling:
  test_size: 0.2
  random_state: 42
  random_forest:
    n_estimators: 100
    max_depth: 15
    criterion: mae
"#;

    #[test]
    fn test_load_from_str_yaml() {
        let result = ConfigLoader::load_from_str(MINIMAL_YAML, ConfigFormat::Yaml, &[]);
        assert!(result.is_ok(), "Failed: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.main.experiment_name, "development");
        assert_eq!(config.modeling.random_forest.len(), 3);
    }

    #[test]
    fn test_random_forest_keeps_file_order() {
        let overrides = vec!["+modeling.random_forest.max_samples=0.8".to_string()];
        let config =
            ConfigLoader::load_from_str(MINIMAL_YAML, ConfigFormat::Yaml, &overrides).unwrap();
        let keys: Vec<&str> = config
            .modeling
            .random_forest
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, vec!["n_estimators", "max_depth", "criterion", "max_samples"]);
    }

    #[test]
    fn test_overrides_applied_before_validation() {
        let overrides = vec![
            "main.steps=download,basic_cleaning".to_string(),
            "modeling.random_state=7".to_string(),
        ];
        let config =
            ConfigLoader::load_from_str(MINIMAL_YAML, ConfigFormat::Yaml, &overrides).unwrap();
        assert_eq!(config.main.steps, "download,basic_cleaning");
        assert_eq!(config.modeling.random_state, 7);

        let bad = vec!["modeling.test_size=2".to_string()];
        let result = ConfigLoader::load_from_str(MINIMAL_YAML, ConfigFormat::Yaml, &bad);
        assert!(matches!(result, Err(ContractError::ConfigValidation { .. })));
    }

    #[test]
    fn test_local_repository_and_empty_step_list_accepted() {
        let overrides = vec![
            "main.components_repository=/home/me/ml project/components".to_string(),
            "main.steps=,".to_string(),
        ];
        let config =
            ConfigLoader::load_from_str(MINIMAL_YAML, ConfigFormat::Yaml, &overrides).unwrap();
        assert_eq!(
            config.main.components_repository,
            "/home/me/ml project/components"
        );
        assert_eq!(config.main.steps, ",");
    }

    #[test]
    fn test_round_trip_json() {
        let config = ConfigLoader::load_from_str(MINIMAL_YAML, ConfigFormat::Yaml, &[]).unwrap();
        let json = ConfigLoader::to_json(&config).unwrap();
        let again = ConfigLoader::load_from_str(&json, ConfigFormat::Json, &[]).unwrap();
        assert_eq!(config.main.steps, again.main.steps);
        assert_eq!(config.modeling.random_forest, again.modeling.random_forest);
    }

    #[test]
    fn test_load_from_path_detects_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");
        std::fs::write(&path, MINIMAL_YAML).unwrap();

        let config = ConfigLoader::load_from_path(&path, &[]).unwrap();
        assert_eq!(config.etl.sample, "sample1.csv");

        let unsupported = dir.path().join("config.ini");
        std::fs::write(&unsupported, MINIMAL_YAML).unwrap();
        let err = ConfigLoader::load_from_path(&unsupported, &[])
            .unwrap_err()
            .to_string();
        assert!(err.contains("unsupported config format"), "got: {err}");
    }

    #[test]
    fn test_missing_file() {
        let result = ConfigLoader::load_from_path(Path::new("/nonexistent/config.yaml"), &[]);
        assert!(matches!(result, Err(ContractError::Io(_))));
    }
}
