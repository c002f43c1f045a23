//! # Orchestration
//!
//! Planning and execution of pre-release job chains.
//!
//! - [`plan`] builds the chains for a run (pure)
//! - [`paths`] derives the run-scoped storage locations
//! - [`executor`] runs chains concurrently and joins them under the timeout

pub mod executor;
pub mod paths;
pub mod plan;

pub use executor::{ChainExecutor, ChainOutcome, Orchestrator, RunReport};
pub use plan::{build_chains, JobChain, JobGroup, RunContext};
