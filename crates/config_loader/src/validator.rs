//! 配置校验模块
//!
//! 校验规则：
//! - `main.*` 字段非空 (derive)
//! - `0 < modeling.test_size < 1` (derive)
//!
//! 步骤名和组件路径不在此校验：未知步骤由编排器告警，路径原样交给后端。

use contracts::{ContractError, PipelineConfig};
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

/// 校验 PipelineConfig 配置
///
/// 返回第一个遇到的错误，或 Ok(())。
pub fn validate(config: &PipelineConfig) -> Result<(), ContractError> {
    validate_derived_rules(config)
}

fn validate_derived_rules(config: &PipelineConfig) -> Result<(), ContractError> {
    match config.validate() {
        Ok(()) => Ok(()),
        Err(errors) => {
            let (field, message) = first_error(&errors, String::new())
                .unwrap_or_else(|| (String::from("<root>"), errors.to_string()));
            Err(ContractError::config_validation(field, message))
        }
    }
}

/// 深度优先查找第一个失败字段，返回点分路径
fn first_error(errors: &ValidationErrors, prefix: String) -> Option<(String, String)> {
    let mut entries: Vec<_> = errors.errors().iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    for (field, kind) in entries {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                if let Some(error) = field_errors.first() {
                    let message = error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| error.code.to_string());
                    return Some((path, message));
                }
            }
            ValidationErrorsKind::Struct(nested) => {
                if let Some(found) = first_error(nested, path) {
                    return Some(found);
                }
            }
            ValidationErrorsKind::List(items) => {
                for (idx, nested) in items {
                    if let Some(found) = first_error(nested, format!("{path}[{idx}]")) {
                        return Some(found);
                    }
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{EtlConfig, MainConfig, ModelingConfig};

    fn minimal_config() -> PipelineConfig {
        PipelineConfig {
            main: MainConfig {
                project_name: "nyc_airbnb".into(),
                experiment_name: "development".into(),
                components_repository: "https://example.com/components".into(),
                steps: "all".into(),
            },
            etl: EtlConfig {
                sample: "sample1.csv".into(),
            },
            modeling: ModelingConfig {
                test_size: 0.2,
                random_state: 42,
                random_forest: Default::default(),
            },
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(validate(&minimal_config()).is_ok());
    }

    #[test]
    fn test_empty_experiment_name() {
        let mut config = minimal_config();
        config.main.experiment_name = String::new();
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("main.experiment_name"), "got: {err}");
        assert!(err.contains("cannot be empty"), "got: {err}");
    }

    #[test]
    fn test_test_size_range() {
        let mut config = minimal_config();
        config.modeling.test_size = 0.0;
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("modeling.test_size"), "got: {err}");
    }

    #[test]
    fn test_step_list_of_commas_accepted() {
        let mut config = minimal_config();
        config.main.steps = ",".into();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_unknown_step_names_pass_loader() {
        let mut config = minimal_config();
        config.main.steps = "download,not_a_step".into();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_local_repository_with_space_accepted() {
        let mut config = minimal_config();
        config.main.components_repository = "/home/me/ml project/components".into();
        assert!(validate(&config).is_ok());
    }
}
