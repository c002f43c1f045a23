//! Shared helpers for integration tests

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use prerelease_it::config::OrchestratorConfig;
use prerelease_it::error::{JobError, JobResult};
use prerelease_it::jobs::{JobId, JobInvocation, JobRegistry, JobRunner};

/// Recording job runner with scripted failures and delays
#[derive(Default)]
pub struct MockRunner {
    calls: Mutex<Vec<String>>,
    failures: Vec<String>,
    delay: Option<Duration>,
    slow: Vec<(String, Duration)>,
}

impl MockRunner {
    pub fn succeeding() -> Self {
        Self::default()
    }

    /// Fail every invocation whose label matches one of `labels`
    pub fn failing_on(labels: &[&str]) -> Self {
        Self {
            failures: labels.iter().map(|l| l.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Delay only the invocation labelled `label`
    pub fn slow_on(mut self, label: &str, delay: Duration) -> Self {
        self.slow.push((label.to_string(), delay));
        self
    }

    /// Labels of every invocation, in call order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn was_called(&self, label: &str) -> bool {
        self.calls().iter().any(|c| c == label)
    }

    pub fn registry(runner: &Arc<Self>) -> JobRegistry {
        JobRegistry::uniform(Arc::clone(runner) as Arc<dyn JobRunner>)
    }
}

#[async_trait]
impl JobRunner for MockRunner {
    async fn run(&self, job: JobId, args: &[String]) -> JobResult<()> {
        // Baseline args trail the invocation args, so the label is unaffected.
        let label = JobInvocation::new(job, args.iter().cloned()).label();
        self.calls.lock().unwrap().push(label.clone());

        if self.failures.contains(&label) {
            return Err(JobError::NonZeroExit { code: 1 });
        }
        let delay = self
            .slow
            .iter()
            .find(|(slow, _)| *slow == label)
            .map(|(_, delay)| *delay)
            .or(self.delay);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(())
    }
}

pub fn test_config() -> OrchestratorConfig {
    OrchestratorConfig {
        storage_prefix: "gs://prerelease-test".to_string(),
        ..OrchestratorConfig::default()
    }
}
