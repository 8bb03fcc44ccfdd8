//! 配置解析模块
//!
//! 支持 YAML、TOML 和 JSON。各格式先解析为通用文档，
//! 覆盖项应用之后再反序列化为强类型配置。

use contracts::{ContractError, PipelineConfig};
use serde_json::Value;

/// 配置文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML 格式 (推荐)
    Yaml,
    /// TOML 格式
    Toml,
    /// JSON 格式
    Json,
}

impl ConfigFormat {
    /// 从文件扩展名推断格式
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "yaml" | "yml" => Some(Self::Yaml),
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// 解析 YAML 格式配置
pub fn parse_yaml(content: &str) -> Result<Value, ContractError> {
    serde_yaml::from_str(content).map_err(|e| ContractError::ConfigParse {
        message: format!("YAML parse error: {e}"),
        source: Some(Box::new(e)),
    })
}

/// 解析 TOML 格式配置
pub fn parse_toml(content: &str) -> Result<Value, ContractError> {
    toml::from_str(content).map_err(|e| ContractError::ConfigParse {
        message: format!("TOML parse error: {e}"),
        source: Some(Box::new(e)),
    })
}

/// 解析 JSON 格式配置
pub fn parse_json(content: &str) -> Result<Value, ContractError> {
    serde_json::from_str(content).map_err(|e| ContractError::ConfigParse {
        message: format!("JSON parse error: {e}"),
        source: Some(Box::new(e)),
    })
}

/// 根据格式解析配置
pub fn parse_document(content: &str, format: ConfigFormat) -> Result<Value, ContractError> {
    let document = match format {
        ConfigFormat::Yaml => parse_yaml(content)?,
        ConfigFormat::Toml => parse_toml(content)?,
        ConfigFormat::Json => parse_json(content)?,
    };

    if !document.is_object() {
        return Err(ContractError::config_parse(
            "top-level configuration must be a mapping",
        ));
    }
    Ok(document)
}

/// 反序列化为强类型配置，缺失字段在此报错
pub fn into_config(document: Value) -> Result<PipelineConfig, ContractError> {
    serde_json::from_value(document).map_err(|e| ContractError::ConfigParse {
        message: format!("missing or malformed key: {e}"),
        source: Some(Box::new(e)),
    })
}
