//! Run report

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One dispatched step
#[derive(Debug, Clone, Serialize)]
pub struct StepRecord {
    pub step: String,
    pub uri: String,
    /// Wall time of the external run
    pub duration: Duration,
}

/// Summary of a completed run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// When dispatching began
    pub started_at: DateTime<Utc>,

    pub project: String,
    pub run_group: String,

    /// Dispatched steps, in order
    pub steps: Vec<StepRecord>,

    /// Canonical steps that were not selected
    pub skipped: Vec<String>,

    /// Selected names no step matched
    pub unknown_steps: Vec<String>,

    /// Hyperparameter file, when the training step ran
    pub rf_config_path: Option<PathBuf>,

    /// Total wall time
    pub duration: Duration,
}

impl RunReport {
    pub fn new(project: impl Into<String>, run_group: impl Into<String>) -> Self {
        Self {
            started_at: Utc::now(),
            project: project.into(),
            run_group: run_group.into(),
            steps: Vec::new(),
            skipped: Vec::new(),
            unknown_steps: Vec::new(),
            rf_config_path: None,
            duration: Duration::ZERO,
        }
    }

    /// Names of dispatched steps, in order
    pub fn dispatched_steps(&self) -> Vec<&str> {
        self.steps.iter().map(|record| record.step.as_str()).collect()
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║                      Pipeline Summary                        ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");

        println!("📊 Overview");
        println!("   ├─ Project: {}", self.project);
        println!("   ├─ Run group: {}", self.run_group);
        println!(
            "   ├─ Started: {}",
            self.started_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
        println!("   └─ Duration: {:.2}s", self.duration.as_secs_f64());

        println!("\n🚀 Steps ({})", self.steps.len());
        for (i, record) in self.steps.iter().enumerate() {
            let prefix = if i == self.steps.len() - 1 { "└─" } else { "├─" };
            println!(
                "   {} {} ({:.2}s) {}",
                prefix,
                record.step,
                record.duration.as_secs_f64(),
                record.uri
            );
        }

        if !self.skipped.is_empty() {
            println!("\n⏭  Skipped: {}", self.skipped.join(", "));
        }

        if !self.unknown_steps.is_empty() {
            println!("\n⚠️  Unknown steps (ignored): {}", self.unknown_steps.join(", "));
        }

        if let Some(path) = &self.rf_config_path {
            println!("\n📝 Random forest config: {}", path.display());
        }

        println!();
    }
}
