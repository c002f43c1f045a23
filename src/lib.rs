#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Dataflow Pre-release Integration Harness
//!
//! Launches the Avro, Parquet, sort-merge-bucket and BigQuery example jobs
//! against a cloud runner, waits for all of them, and fails loudly if any job
//! fails.
//!
//! ## Module Organization
//!
//! - [`config`] - Runner settings and orchestration knobs
//! - [`error`] - Structured error handling
//! - [`jobs`] - Job identifiers, invocations and the runner registry
//! - [`logging`] - Structured logging setup
//! - [`orchestration`] - Chain planning and concurrent execution
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use prerelease_it::config::OrchestratorConfig;
//! use prerelease_it::jobs::{JobRegistry, ProcessJobRunner};
//! use prerelease_it::orchestration::{Orchestrator, RunContext};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = OrchestratorConfig::load(None)?;
//! let registry = JobRegistry::uniform(Arc::new(ProcessJobRunner::new(config.launcher.clone())));
//! let orchestrator = Orchestrator::new(registry, &config, tokio::runtime::Handle::current());
//!
//! let report = orchestrator.run(&RunContext::new("abc123"), &config).await?;
//! println!("{} chains succeeded", report.succeeded());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod jobs;
pub mod logging;
pub mod orchestration;

pub use config::{OrchestratorConfig, RunnerConfig, RunnerOverrides};
pub use error::{ConfigurationError, JobError, OrchestrationError, OrchestrationResult};
pub use jobs::{JobId, JobInvocation, JobRegistry, JobRunner, ProcessJobRunner};
pub use orchestration::{build_chains, JobChain, JobGroup, Orchestrator, RunContext, RunReport};
