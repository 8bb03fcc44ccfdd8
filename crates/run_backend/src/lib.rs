//! # Run Backend
//!
//! Run-execution backends that resolve a component reference and execute it.
//!
//! Responsibilities:
//! - Submit `RunInvocation`s to the `mlflow` command line client
//! - Provide a recording mock for tests and dry runs

pub mod mlflow;
pub mod mock;

pub use contracts::{RunBackend, RunContext, RunInvocation};
pub use mlflow::{MlflowCliBackend, MlflowCliSettings};
pub use mock::{MockBackendConfig, MockRunBackend, RecordedRun};
