//! # Orchestrator
//!
//! Config-driven dispatcher for the ML pipeline steps.
//!
//! Each step is an externally defined component run through a [`RunBackend`].
//! The orchestrator only decides *which* steps run, *in what order* and *with
//! which parameters*; the components own the data.
//!
//! ## Run lifecycle
//!
//! ```text
//! config ─▶ selection ─▶ tracking env ─▶ scratch dir
//!                                           │
//!        download → basic_cleaning → data_check → data_split → train_random_forest
//!                                           │
//!                                     scratch removed
//! ```
//!
//! [`RunBackend`]: contracts::RunBackend

pub mod error;
pub mod hyperparams;
mod orchestrator;
pub mod report;
pub mod selection;
pub mod steps;
pub mod tracking;

pub use error::{OrchestratorError, Result};
pub use orchestrator::{leftover_scratch_dirs, plan, Orchestrator, OrchestratorOptions};
pub use report::{RunReport, StepRecord};
pub use selection::StepSelection;
pub use steps::{StepDefinition, StepRegistry};
pub use tracking::TrackingEnvironment;
