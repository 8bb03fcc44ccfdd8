//! RunBackend trait - run-execution interface
//!
//! Resolves a component reference and executes it in its own environment.

use std::path::PathBuf;

use crate::{ContractError, RunInvocation};

/// Per-run resources shared with every submitted invocation
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Scratch directory owned by the orchestrator for the run's lifetime
    pub scratch_dir: PathBuf,
}

/// Run execution trait
///
/// All backend implementations must implement this trait.
#[trait_variant::make(RunBackend: Send)]
pub trait LocalRunBackend {
    /// Backend name (used for logging)
    fn name(&self) -> &str;

    /// Execute one invocation and wait for it to finish
    ///
    /// # Errors
    /// Returns the backend failure; the orchestrator does not retry
    async fn submit(
        &self,
        invocation: &RunInvocation,
        context: &RunContext,
    ) -> Result<(), ContractError>;
}
