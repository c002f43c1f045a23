//! # Job Registry
//!
//! Explicit lookup table from [`JobId`] to the runner that launches it.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use super::JobId;
use crate::error::{JobError, JobResult};

/// Launches one external job and resolves once it has finished
#[async_trait]
pub trait JobRunner: Send + Sync {
    /// Run `job` with the full argument list, resolving to `Ok(())` on success
    async fn run(&self, job: JobId, args: &[String]) -> JobResult<()>;
}

/// Registry of runners keyed by job id
#[derive(Clone, Default)]
pub struct JobRegistry {
    runners: HashMap<JobId, Arc<dyn JobRunner>>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry where every known job is served by the same runner
    pub fn uniform(runner: Arc<dyn JobRunner>) -> Self {
        let mut registry = Self::new();
        for job in JobId::ALL {
            registry.register(job, Arc::clone(&runner));
        }
        registry
    }

    pub fn register(&mut self, job: JobId, runner: Arc<dyn JobRunner>) {
        debug!(job = %job, "Registering job runner");
        self.runners.insert(job, runner);
    }

    pub fn resolve(&self, job: JobId) -> JobResult<Arc<dyn JobRunner>> {
        self.runners
            .get(&job)
            .cloned()
            .ok_or_else(|| JobError::NotRegistered(job.to_string()))
    }

    pub fn len(&self) -> usize {
        self.runners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runners.is_empty()
    }
}

impl std::fmt::Debug for JobRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut jobs: Vec<_> = self.runners.keys().collect();
        jobs.sort();
        f.debug_struct("JobRegistry").field("jobs", &jobs).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AlwaysOk;

    #[async_trait]
    impl JobRunner for AlwaysOk {
        async fn run(&self, _job: JobId, _args: &[String]) -> JobResult<()> {
            Ok(())
        }
    }

    #[test]
    fn test_uniform_registry_covers_every_job() {
        let registry = JobRegistry::uniform(Arc::new(AlwaysOk));
        assert_eq!(registry.len(), JobId::ALL.len());
        for job in JobId::ALL {
            assert!(registry.resolve(job).is_ok());
        }
    }

    #[tokio::test]
    async fn test_resolve_unregistered_job() {
        let mut registry = JobRegistry::new();
        assert!(registry.is_empty());
        registry.register(JobId::AvroExample, Arc::new(AlwaysOk));

        let runner = registry.resolve(JobId::AvroExample).unwrap();
        assert!(runner.run(JobId::AvroExample, &[]).await.is_ok());

        let err = registry.resolve(JobId::ParquetExample).err();
        assert_eq!(
            err,
            Some(JobError::NotRegistered("ParquetExample".to_string()))
        );
    }
}
