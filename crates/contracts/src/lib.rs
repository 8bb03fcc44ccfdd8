//! # Contracts
//!
//! Shared interface contracts between the loader, the orchestrator and the run
//! backends. Business crates depend on this crate, never on each other's
//! internals.
//!
//! ## Artifact model
//! - Artifacts are named, versioned objects owned by the tracking backend
//! - The orchestrator only ever passes `name:tag` references around

mod artifact;
mod backend;
mod config;
mod error;
mod invocation;

pub use artifact::*;
pub use backend::{LocalRunBackend, RunBackend, RunContext};
pub use config::*;
pub use error::*;
pub use invocation::*;
