//! RunInvocation - what the orchestrator hands to a run backend

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Entry point every component exposes
pub const DEFAULT_ENTRY_POINT: &str = "main";

/// Parameter value passed to an external component
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Path(PathBuf),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Path(p) => write!(f, "{}", p.display()),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<PathBuf> for ParamValue {
    fn from(value: PathBuf) -> Self {
        Self::Path(value)
    }
}

/// String-keyed parameter mapping, ordered for stable logs and command lines
pub type Parameters = BTreeMap<String, ParamValue>;

/// One external run request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunInvocation {
    /// Pipeline step this run executes
    pub step: String,

    /// Component location: `{components_repository}/{component}`
    pub uri: String,

    /// Entry point inside the component
    pub entry_point: String,

    /// Pinned component version (branch, tag or commit)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Resolved parameters
    pub parameters: Parameters,
}

impl RunInvocation {
    pub fn new(step: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            step: step.into(),
            uri: uri.into(),
            entry_point: DEFAULT_ENTRY_POINT.to_string(),
            version: None,
            parameters: Parameters::new(),
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    /// Look up a parameter by key
    pub fn param(&self, key: &str) -> Option<&ParamValue> {
        self.parameters.get(key)
    }
}
