//! Error types for the pre-release harness.
//!

use std::time::Duration;
use thiserror::Error;

use crate::jobs::JobId;

pub type ConfigResult<T> = Result<T, ConfigurationError>;
pub type JobResult<T> = Result<T, JobError>;
pub type OrchestrationResult<T> = Result<T, OrchestrationError>;

/// Underlying cause of a single external job failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JobError {
    #[error("failed to launch {program}: {reason}")]
    SpawnFailed { program: String, reason: String },
    #[error("job exited with status code {code}")]
    NonZeroExit { code: i32 },
    #[error("job was terminated by a signal")]
    Terminated,
    #[error("no runner registered for job {0}")]
    NotRegistered(String),
    #[error("job runner panicked: {0}")]
    Panicked(String),
    #[error("job failed: {0}")]
    Other(String),
}

impl JobError {
    pub fn spawn_failed(program: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SpawnFailed {
            program: program.into(),
            reason: reason.into(),
        }
    }
}

/// Configuration loading and validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),
    #[error("invalid configuration value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

impl ConfigurationError {
    pub fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<config::ConfigError> for ConfigurationError {
    fn from(err: config::ConfigError) -> Self {
        Self::LoadFailed(err.to_string())
    }
}

/// Orchestration-level errors surfaced to the caller of a run
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OrchestrationError {
    /// An external job reported failure
    #[error("Job {job} failed")]
    JobInvocationFailure {
        job: JobId,
        #[source]
        source: JobError,
    },

    /// The global wait bound elapsed before every chain resolved
    #[error("Timed out after {timeout:?} waiting for jobs to finish")]
    OrchestrationTimeout { timeout: Duration },

    /// Overall run outcome when one or more chains failed
    #[error("at least one job failed ({failed} of {total} chains)")]
    AggregateFailure {
        failed: usize,
        total: usize,
        #[source]
        source: Box<OrchestrationError>,
    },

    /// A chain task could not be joined
    #[error("chain '{chain}' task aborted: {reason}")]
    ChainPanicked { chain: String, reason: String },

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

impl OrchestrationError {
    pub fn job_failure(job: JobId, source: JobError) -> Self {
        Self::JobInvocationFailure { job, source }
    }

    /// Whether this is a timeout rather than a job failure
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::OrchestrationTimeout { .. })
    }
}
