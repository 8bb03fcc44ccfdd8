//! `info` command implementation.

use std::path::Path;

use anyhow::{Context, Result};
use contracts::{ParamValue, PipelineConfig, RunInvocation};
use orchestrator::{OrchestratorOptions, StepDefinition, StepRegistry};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::info;

use super::load_config;
use crate::cli::InfoArgs;
use crate::error::CliError;

/// Configuration info for JSON output
#[derive(Serialize)]
struct ConfigInfo {
    project_name: String,
    experiment_name: String,
    components_repository: String,
    steps: String,
    sample: String,
    test_size: f64,
    random_state: i64,
    random_forest: Map<String, Value>,
    plan: Vec<RunInvocation>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    step_table: Vec<StepDefinition>,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration info");

    let config = load_config(&args.config, &args.overrides)?;

    let options = OrchestratorOptions::from_current_dir().map_err(CliError::from)?;
    let registry = StepRegistry::canonical();
    let plan =
        orchestrator::plan(&registry, &config, &options.work_dir).map_err(CliError::from)?;

    let step_table: Vec<StepDefinition> = if args.steps {
        registry.iter().cloned().collect()
    } else {
        Vec::new()
    };

    if args.json {
        let info = build_config_info(&config, plan, step_table);
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_config_info(&config, &plan, &step_table);
    }

    Ok(())
}

fn build_config_info(
    config: &PipelineConfig,
    plan: Vec<RunInvocation>,
    step_table: Vec<StepDefinition>,
) -> ConfigInfo {
    ConfigInfo {
        project_name: config.main.project_name.clone(),
        experiment_name: config.main.experiment_name.clone(),
        components_repository: config.main.components_repository.clone(),
        steps: config.main.steps.clone(),
        sample: config.etl.sample.clone(),
        test_size: config.modeling.test_size,
        random_state: config.modeling.random_state,
        random_forest: config.modeling.random_forest.clone(),
        plan,
        step_table,
    }
}

fn print_config_info(config: &PipelineConfig, plan: &[RunInvocation], step_table: &[StepDefinition]) {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║               Pipeline Runner Configuration                  ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("📍 Main");
    println!("   ├─ Project: {}", config.main.project_name);
    println!("   ├─ Run group: {}", config.main.experiment_name);
    println!("   ├─ Components: {}", config.main.components_repository);
    println!("   └─ Steps: {}", config.main.steps);

    println!("\n🧹 ETL");
    println!("   └─ Sample: {}", config.etl.sample);

    println!("\n🌲 Modeling");
    println!("   ├─ Test size: {}", config.modeling.test_size);
    println!("   ├─ Random state: {}", config.modeling.random_state);
    println!(
        "   └─ Random forest ({} parameters)",
        config.modeling.random_forest.len()
    );
    let count = config.modeling.random_forest.len();
    for (i, (key, value)) in config.modeling.random_forest.iter().enumerate() {
        let prefix = if i == count - 1 { "└─" } else { "├─" };
        println!("         {} {} = {}", prefix, key, value);
    }

    println!("\n🚀 Dispatch plan ({})", plan.len());
    for (i, invocation) in plan.iter().enumerate() {
        let is_last = i == plan.len() - 1;
        let prefix = if is_last { "└─" } else { "├─" };
        let child_prefix = if is_last { "   " } else { "│  " };

        match &invocation.version {
            Some(version) => println!(
                "   {} {} ({} @ {})",
                prefix, invocation.step, invocation.uri, version
            ),
            None => println!("   {} {} ({})", prefix, invocation.step, invocation.uri),
        }
        for (key, value) in &invocation.parameters {
            let shown = match value {
                ParamValue::Path(path) => path_display(path),
                other => other.to_string(),
            };
            println!("   {}     {} = {}", child_prefix, key, shown);
        }
    }

    if !step_table.is_empty() {
        println!("\n📋 Step table ({})", step_table.len());
        for (i, step) in step_table.iter().enumerate() {
            let prefix = if i == step_table.len() - 1 { "└─" } else { "├─" };
            let inputs: Vec<String> = step.inputs.iter().map(ToString::to_string).collect();
            let outputs: Vec<&str> = step.outputs.iter().map(|o| o.name).collect();
            println!(
                "   {} {:<22} {:<24} in: [{}] out: [{}]{}",
                prefix,
                step.name,
                step.component,
                inputs.join(", "),
                outputs.join(", "),
                if step.in_default_set { "" } else { " (explicit only)" }
            );
        }
    }

    println!();
}

fn path_display(path: &Path) -> String {
    format!("{} (written at run time)", path.display())
}
