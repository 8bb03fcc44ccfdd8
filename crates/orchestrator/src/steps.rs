//! Step registry
//!
//! The pipeline is an ordered table of step records. Order in the table is the
//! dispatch order and mirrors the data dependencies:
//! download → basic_cleaning → {data_check, data_split} → train_random_forest
//! → test_regression_model.

use std::path::Path;

use contracts::{ArtifactRef, ArtifactSpec, PipelineConfig, RunInvocation};
use serde::Serialize;

use crate::error::{OrchestratorError, Result};

pub const DOWNLOAD: &str = "download";
pub const BASIC_CLEANING: &str = "basic_cleaning";
pub const DATA_CHECK: &str = "data_check";
pub const DATA_SPLIT: &str = "data_split";
pub const TRAIN_RANDOM_FOREST: &str = "train_random_forest";
pub const TEST_REGRESSION_MODEL: &str = "test_regression_model";

/// Parameter key family used for a step's output declarations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputKeys {
    /// `artifact_name`, `artifact_type`, `artifact_description`
    Artifact,
    /// `output_artifact`, `output_artifact_type`, `output_artifact_description`
    OutputArtifact,
}

/// Step-specific parameters taken from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtraParams {
    None,
    /// `sample` = `etl.sample`
    Sample,
    /// `test_size`, `random_state` from `modeling`
    SplitSettings,
    /// `rf_config` = path of the serialized `modeling.random_forest`
    RandomForestConfig,
}

/// One pipeline step
#[derive(Debug, Clone, Serialize)]
pub struct StepDefinition {
    /// Step name as used in `main.steps`
    pub name: &'static str,
    /// Component directory under `main.components_repository`
    pub component: &'static str,
    /// Pinned component version
    pub version: Option<&'static str>,
    /// Member of the `all` selection
    pub in_default_set: bool,
    /// Consumed artifacts, in parameter order
    pub inputs: &'static [ArtifactRef],
    /// Declared artifacts, in parameter order
    pub outputs: &'static [ArtifactSpec],
    pub output_keys: OutputKeys,
    pub extra: ExtraParams,
}

const CANONICAL_STEPS: [StepDefinition; 6] = [
    StepDefinition {
        name: DOWNLOAD,
        component: "get_data",
        version: Some("main"),
        in_default_set: true,
        inputs: &[],
        outputs: &[ArtifactSpec::new(
            "sample.csv",
            "raw_data",
            "Raw file as downloaded",
        )],
        output_keys: OutputKeys::Artifact,
        extra: ExtraParams::Sample,
    },
    StepDefinition {
        name: BASIC_CLEANING,
        component: "basic_cleaning",
        version: None,
        in_default_set: true,
        inputs: &[ArtifactRef::latest("sample.csv")],
        outputs: &[ArtifactSpec::new("cleaned.csv", "cleaned_data", "Cleaned file")],
        output_keys: OutputKeys::OutputArtifact,
        extra: ExtraParams::None,
    },
    StepDefinition {
        name: DATA_CHECK,
        component: "data_check",
        version: None,
        in_default_set: true,
        inputs: &[ArtifactRef::latest("cleaned.csv")],
        outputs: &[ArtifactSpec::new("data_check.json", "data_check", "Data check")],
        output_keys: OutputKeys::OutputArtifact,
        extra: ExtraParams::None,
    },
    StepDefinition {
        name: DATA_SPLIT,
        component: "data_split",
        version: None,
        in_default_set: true,
        inputs: &[ArtifactRef::latest("cleaned.csv")],
        outputs: &[
            ArtifactSpec::new("train.csv", "train_data", "Train data"),
            ArtifactSpec::new("test.csv", "test_data", "Test data"),
        ],
        output_keys: OutputKeys::OutputArtifact,
        extra: ExtraParams::SplitSettings,
    },
    StepDefinition {
        name: TRAIN_RANDOM_FOREST,
        component: "train_random_forest",
        version: None,
        in_default_set: true,
        inputs: &[ArtifactRef::latest("train.csv")],
        outputs: &[ArtifactSpec::new(
            "random_forest.pkl",
            "random_forest_model",
            "Random forest model",
        )],
        output_keys: OutputKeys::OutputArtifact,
        extra: ExtraParams::RandomForestConfig,
    },
    // Needs a model export promoted to "prod"; only runs when named explicitly.
    StepDefinition {
        name: TEST_REGRESSION_MODEL,
        component: "test_regression_model",
        version: None,
        in_default_set: false,
        inputs: &[
            ArtifactRef::prod("random_forest.pkl"),
            ArtifactRef::latest("test.csv"),
        ],
        outputs: &[ArtifactSpec::new(
            "test_regression_model.json",
            "test_regression_model",
            "Test regression model",
        )],
        output_keys: OutputKeys::OutputArtifact,
        extra: ExtraParams::None,
    },
];

/// `""` for the first artifact, `_2`, `_3`, ... after that
fn key_suffix(index: usize) -> String {
    if index == 0 {
        String::new()
    } else {
        format!("_{}", index + 1)
    }
}

impl StepDefinition {
    /// Component location under the repository base
    pub fn component_uri(&self, components_repository: &str) -> String {
        format!(
            "{}/{}",
            components_repository.trim_end_matches('/'),
            self.component
        )
    }

    /// Build the invocation for this step
    ///
    /// `rf_config_path` is only read by the random forest step.
    pub fn build_invocation(&self, config: &PipelineConfig, rf_config_path: &Path) -> RunInvocation {
        let mut invocation = RunInvocation::new(
            self.name,
            self.component_uri(&config.main.components_repository),
        );
        if let Some(version) = self.version {
            invocation = invocation.with_version(version);
        }

        for (idx, input) in self.inputs.iter().enumerate() {
            invocation = invocation.with_param(
                format!("input_artifact{}", key_suffix(idx)),
                input.to_string(),
            );
        }

        let (name_key, type_key, description_key) = match self.output_keys {
            OutputKeys::Artifact => ("artifact_name", "artifact_type", "artifact_description"),
            OutputKeys::OutputArtifact => (
                "output_artifact",
                "output_artifact_type",
                "output_artifact_description",
            ),
        };
        for (idx, output) in self.outputs.iter().enumerate() {
            let suffix = key_suffix(idx);
            invocation = invocation
                .with_param(format!("{name_key}{suffix}"), output.name)
                .with_param(format!("{type_key}{suffix}"), output.artifact_type)
                .with_param(format!("{description_key}{suffix}"), output.description);
        }

        match self.extra {
            ExtraParams::None => invocation,
            ExtraParams::Sample => invocation.with_param("sample", config.etl.sample.clone()),
            ExtraParams::SplitSettings => invocation
                .with_param("test_size", config.modeling.test_size)
                .with_param("random_state", config.modeling.random_state),
            ExtraParams::RandomForestConfig => {
                invocation.with_param("rf_config", rf_config_path.to_path_buf())
            }
        }
    }
}

/// Ordered set of known steps
#[derive(Debug, Clone)]
pub struct StepRegistry {
    steps: Vec<StepDefinition>,
}

impl Default for StepRegistry {
    fn default() -> Self {
        Self::canonical()
    }
}

impl StepRegistry {
    /// The built-in six-step pipeline
    pub fn canonical() -> Self {
        Self {
            steps: CANONICAL_STEPS.to_vec(),
        }
    }

    /// Registry over an arbitrary step table
    pub fn from_steps(steps: Vec<StepDefinition>) -> Self {
        Self { steps }
    }

    pub fn iter(&self) -> impl Iterator<Item = &StepDefinition> {
        self.steps.iter()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&StepDefinition> {
        self.steps.iter().find(|step| step.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Names selected by `all`, in pipeline order
    pub fn default_step_names(&self) -> Vec<&'static str> {
        self.steps
            .iter()
            .filter(|step| step.in_default_set)
            .map(|step| step.name)
            .collect()
    }

    /// Every input must be declared as an output by an earlier step
    pub fn check_artifact_chain(&self) -> Result<()> {
        for (idx, step) in self.steps.iter().enumerate() {
            for input in step.inputs {
                let produced = self.steps[..idx]
                    .iter()
                    .flat_map(|upstream| upstream.outputs.iter())
                    .any(|output| output.name == input.name);
                if !produced {
                    return Err(OrchestratorError::BrokenArtifactChain {
                        step: step.name.to_string(),
                        artifact: input.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}
