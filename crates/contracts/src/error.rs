//! Layered error definitions
//!
//! Categorized by source: config / run backend

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error (syntax or missing key)
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    /// Command line override could not be applied
    #[error("invalid override '{expression}': {message}")]
    ConfigOverride { expression: String, message: String },

    // ===== Run Backend Errors =====
    /// External run finished unsuccessfully
    #[error("run '{step}' failed{}: {message}", exit_suffix(.exit_code))]
    RunFailed {
        step: String,
        exit_code: Option<i32>,
        message: String,
    },

    /// Backend executable or service cannot be reached
    #[error("run backend '{backend}' unavailable: {message}")]
    BackendUnavailable { backend: String, message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

fn exit_suffix(exit_code: &Option<i32>) -> String {
    exit_code
        .map(|code| format!(" with exit code {code}"))
        .unwrap_or_default()
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create override error
    pub fn config_override(expression: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigOverride {
            expression: expression.into(),
            message: message.into(),
        }
    }

    /// Create run failure
    pub fn run_failed(
        step: impl Into<String>,
        exit_code: Option<i32>,
        message: impl Into<String>,
    ) -> Self {
        Self::RunFailed {
            step: step.into(),
            exit_code,
            message: message.into(),
        }
    }

    /// Create backend unavailable error
    pub fn backend_unavailable(backend: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BackendUnavailable {
            backend: backend.into(),
            message: message.into(),
        }
    }
}
