//! Step selection from `main.steps`

use contracts::ALL_STEPS;

use crate::steps::StepRegistry;

/// Which steps a run dispatches
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepSelection {
    /// `all`: every step flagged as part of the default set
    All,
    /// Exactly the named steps; order is not used for dispatch
    Explicit(Vec<String>),
}

impl StepSelection {
    /// Parse `main.steps`
    ///
    /// Entries are trimmed, empty entries dropped, duplicates collapsed.
    pub fn parse(steps: &str) -> Self {
        if steps == ALL_STEPS {
            return Self::All;
        }

        let mut names: Vec<String> = Vec::new();
        for name in steps.split(',').map(str::trim).filter(|n| !n.is_empty()) {
            if !names.iter().any(|existing| existing == name) {
                names.push(name.to_string());
            }
        }
        Self::Explicit(names)
    }

    /// Raw entries that only match a step after trimming, e.g. `" download"`
    pub fn padded_entries(steps: &str) -> Vec<String> {
        if steps == ALL_STEPS {
            return Vec::new();
        }

        steps
            .split(',')
            .filter(|entry| {
                let trimmed = entry.trim();
                !trimmed.is_empty() && trimmed.len() != entry.len()
            })
            .map(str::to_string)
            .collect()
    }

    /// Whether the step is active
    pub fn contains(&self, registry: &StepRegistry, step: &str) -> bool {
        match self {
            Self::All => registry
                .get(step)
                .is_some_and(|definition| definition.in_default_set),
            Self::Explicit(names) => names.iter().any(|name| name == step),
        }
    }

    /// The active set as names
    pub fn active_names(&self, registry: &StepRegistry) -> Vec<String> {
        match self {
            Self::All => registry
                .default_step_names()
                .into_iter()
                .map(str::to_string)
                .collect(),
            Self::Explicit(names) => names.clone(),
        }
    }

    /// Named steps the registry does not know; they never dispatch
    pub fn unknown_names(&self, registry: &StepRegistry) -> Vec<String> {
        match self {
            Self::All => Vec::new(),
            Self::Explicit(names) => names
                .iter()
                .filter(|name| !registry.contains(name))
                .cloned()
                .collect(),
        }
    }

    /// Named steps outside the default set (e.g. the model test)
    pub fn non_default_names(&self, registry: &StepRegistry) -> Vec<String> {
        match self {
            Self::All => Vec::new(),
            Self::Explicit(names) => names
                .iter()
                .filter(|name| registry.get(name).is_some_and(|s| !s.in_default_set))
                .cloned()
                .collect(),
        }
    }
}
