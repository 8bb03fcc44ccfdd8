//! `validate` command implementation.

use anyhow::{Context, Result};
use contracts::PipelineConfig;
use orchestrator::{StepRegistry, StepSelection};
use serde::Serialize;
use tracing::info;

use super::load_config;
use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    project_name: String,
    experiment_name: String,
    components_repository: String,
    active_steps: Vec<String>,
    test_size: f64,
    hyperparameter_count: usize,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();
    let invalid = |config_path: String, error: String| ValidationResult {
        valid: false,
        config_path,
        error: Some(error),
        warnings: None,
        summary: None,
    };

    let config = match load_config(&args.config, &args.overrides) {
        Ok(config) => config,
        Err(e) => return invalid(config_path, e.to_string()),
    };

    let registry = StepRegistry::canonical();
    if let Err(e) = registry.check_artifact_chain() {
        return invalid(config_path, e.to_string());
    }

    let selection = StepSelection::parse(&config.main.steps);
    let warnings = collect_warnings(&registry, &config.main.steps);

    ValidationResult {
        valid: true,
        config_path,
        error: None,
        warnings: if warnings.is_empty() {
            None
        } else {
            Some(warnings)
        },
        summary: Some(summarize(&config, &registry, &selection)),
    }
}

fn summarize(
    config: &PipelineConfig,
    registry: &StepRegistry,
    selection: &StepSelection,
) -> ConfigSummary {
    ConfigSummary {
        project_name: config.main.project_name.clone(),
        experiment_name: config.main.experiment_name.clone(),
        components_repository: config.main.components_repository.clone(),
        active_steps: registry
            .iter()
            .filter(|step| selection.contains(registry, step.name))
            .map(|step| step.name.to_string())
            .collect(),
        test_size: config.modeling.test_size,
        hyperparameter_count: config.modeling.random_forest.len(),
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(registry: &StepRegistry, steps: &str) -> Vec<String> {
    let selection = StepSelection::parse(steps);
    let mut warnings = Vec::new();

    for entry in StepSelection::padded_entries(steps) {
        warnings.push(format!(
            "Step entry '{}' has surrounding whitespace and is read as '{}'",
            entry,
            entry.trim()
        ));
    }

    for name in selection.unknown_names(registry) {
        warnings.push(format!("Step '{}' is not part of the pipeline and will be ignored", name));
    }

    for name in selection.non_default_names(registry) {
        warnings.push(format!(
            "Step '{}' requires a model promoted to 'prod' in the tracking backend",
            name
        ));
    }

    if !registry.iter().any(|step| selection.contains(registry, step.name)) {
        warnings.push("main.steps selects no known step - nothing will run".to_string());
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Project: {}", summary.project_name);
            println!("  Run group: {}", summary.experiment_name);
            println!("  Components: {}", summary.components_repository);
            println!("  Steps: {}", summary.active_steps.join(" → "));
            println!("  Test size: {}", summary.test_size);
            println!("  Random forest parameters: {}", summary.hyperparameter_count);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
