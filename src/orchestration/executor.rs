//! # Chain Executor
//!
//! Runs job chains: sequentially within a chain, concurrently across chains,
//! then a fan-in join bounded by the global timeout.
//!
//! ## Failure semantics
//!
//! - A failed invocation aborts the rest of its own chain only.
//! - Sibling chains are never cancelled; the join waits for all of them.
//! - The overall run fails with [`OrchestrationError::AggregateFailure`] when
//!   any chain failed, wrapping the first failure observed by the join.
//! - Exceeding the timeout yields [`OrchestrationError::OrchestrationTimeout`].
//!   In-flight jobs are abandoned, not killed.
//!
//! ## Shared upstream invocations
//!
//! An invocation that appears in several chains (the SMB write feeding both
//! the join and the transform) is dispatched once. Every chain containing it
//! awaits the same shared outcome.

use dashmap::DashMap;
use futures::future::{join_all, BoxFuture, Shared};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::runtime::Handle;
use tracing::{debug, info, warn};

use super::plan::{build_chains, JobChain, JobGroup, RunContext};
use crate::config::OrchestratorConfig;
use crate::error::{JobError, OrchestrationError, OrchestrationResult};
use crate::jobs::{JobInvocation, JobRegistry};
use crate::logging::{log_error, log_group_start, log_job_operation};

type SharedOutcome = Shared<BoxFuture<'static, OrchestrationResult<()>>>;

/// Outcome of one chain
#[derive(Debug, Clone)]
pub struct ChainOutcome {
    pub chain: String,
    /// Invocations that completed successfully, in order
    pub completed: usize,
    pub result: OrchestrationResult<()>,
}

/// Summary of a run where every chain resolved before the timeout
#[derive(Debug, Clone)]
pub struct RunReport {
    pub outcomes: Vec<ChainOutcome>,
    pub elapsed: Duration,
}

impl RunReport {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn failures(&self) -> impl Iterator<Item = &ChainOutcome> {
        self.outcomes.iter().filter(|o| o.result.is_err())
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    /// `Ok(self)` if every chain succeeded, else the aggregate failure
    pub fn into_result(self) -> OrchestrationResult<RunReport> {
        let failed = self.total() - self.succeeded();
        let first = self.outcomes.iter().find_map(|o| o.result.clone().err());
        match first {
            None => Ok(self),
            Some(first) => Err(OrchestrationError::AggregateFailure {
                failed,
                total: self.total(),
                source: Box::new(first),
            }),
        }
    }
}

/// Runs chains against a job registry. Cheap to clone; clones share the
/// dispatch table, so one executor serves exactly one run.
#[derive(Clone)]
pub struct ChainExecutor {
    registry: Arc<JobRegistry>,
    baseline: Arc<[String]>,
    dispatched: Arc<DashMap<JobInvocation, SharedOutcome>>,
}

impl ChainExecutor {
    pub fn new(registry: JobRegistry, baseline: Vec<String>) -> Self {
        Self {
            registry: Arc::new(registry),
            baseline: baseline.into(),
            dispatched: Arc::new(DashMap::new()),
        }
    }

    /// Executor for a new run: same registry and baseline, empty dispatch table
    pub fn for_new_run(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            baseline: Arc::clone(&self.baseline),
            dispatched: Arc::new(DashMap::new()),
        }
    }

    /// Run a chain in order, stopping at the first failed invocation
    pub async fn run_chain(&self, chain: &JobChain) -> ChainOutcome {
        let mut completed = 0;
        for invocation in chain.invocations() {
            if let Err(err) = self.dispatch(invocation, chain.name()).await {
                let skipped = chain.len() - completed - 1;
                warn!(
                    chain = %chain.name(),
                    job = %invocation.label(),
                    skipped,
                    error = %err,
                    "Chain aborted"
                );
                return ChainOutcome {
                    chain: chain.name().to_string(),
                    completed,
                    result: Err(err),
                };
            }
            completed += 1;
        }

        debug!(chain = %chain.name(), completed, "Chain finished");
        ChainOutcome {
            chain: chain.name().to_string(),
            completed,
            result: Ok(()),
        }
    }

    /// Shared outcome for `invocation`, launching it on first request
    fn dispatch(&self, invocation: &JobInvocation, chain: &str) -> SharedOutcome {
        self.dispatched
            .entry(invocation.clone())
            .or_insert_with(|| {
                Self::invoke(
                    Arc::clone(&self.registry),
                    Arc::clone(&self.baseline),
                    invocation.clone(),
                    chain.to_string(),
                )
                .boxed()
                .shared()
            })
            .clone()
    }

    async fn invoke(
        registry: Arc<JobRegistry>,
        baseline: Arc<[String]>,
        invocation: JobInvocation,
        chain: String,
    ) -> OrchestrationResult<()> {
        let job = invocation.job();
        let label = invocation.label();
        let runner = registry
            .resolve(job)
            .map_err(|e| OrchestrationError::job_failure(job, e))?;

        let args = invocation.command_args(&baseline);
        log_job_operation("invoke", &label, &chain, "started", None, None);
        let started = Instant::now();

        let result = AssertUnwindSafe(runner.run(job, &args))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| Err(JobError::Panicked(panic_message(&*panic))));

        let duration_ms = started.elapsed().as_millis() as u64;
        match result {
            Ok(()) => {
                log_job_operation("invoke", &label, &chain, "succeeded", Some(duration_ms), None);
                Ok(())
            }
            Err(cause) => {
                let details = cause.to_string();
                log_job_operation(
                    "invoke",
                    &label,
                    &chain,
                    "failed",
                    Some(duration_ms),
                    Some(&details),
                );
                Err(OrchestrationError::job_failure(job, cause))
            }
        }
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Owns the executor, the scheduling handle and the global timeout
pub struct Orchestrator {
    executor: ChainExecutor,
    handle: Handle,
    timeout: Duration,
}

impl Orchestrator {
    /// `handle` is the runtime the chain tasks are spawned on
    pub fn new(registry: JobRegistry, config: &OrchestratorConfig, handle: Handle) -> Self {
        Self {
            executor: ChainExecutor::new(registry, config.runner.baseline_args()),
            handle,
            timeout: config.timeout(),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Plan and run every chain for `ctx`
    pub async fn run(
        &self,
        ctx: &RunContext,
        config: &OrchestratorConfig,
    ) -> OrchestrationResult<RunReport> {
        info!(run_id = %ctx.run_id(), "Planning pre-release jobs");
        self.run_all(build_chains(ctx, config)).await
    }

    /// Spawn one task per chain and join them all within the timeout
    pub async fn run_all(&self, groups: Vec<JobGroup>) -> OrchestrationResult<RunReport> {
        let started = Instant::now();
        let mut names = Vec::new();
        let mut tasks = Vec::new();
        let run_executor = self.executor.for_new_run();

        for group in groups {
            log_group_start(group.name, group.chains.len());
            for chain in group.chains {
                let executor = run_executor.clone();
                names.push(chain.name().to_string());
                tasks.push(
                    self.handle
                        .spawn(async move { executor.run_chain(&chain).await }),
                );
            }
        }

        let joined = match tokio::time::timeout(self.timeout, join_all(tasks)).await {
            Ok(joined) => joined,
            Err(_) => {
                let err = OrchestrationError::OrchestrationTimeout {
                    timeout: self.timeout,
                };
                log_error("orchestrator", "run_all", &err.to_string(), None);
                return Err(err);
            }
        };

        let outcomes: Vec<ChainOutcome> = names
            .into_iter()
            .zip(joined)
            .map(|(chain, joined)| {
                joined.unwrap_or_else(|e| ChainOutcome {
                    result: Err(OrchestrationError::ChainPanicked {
                        chain: chain.clone(),
                        reason: e.to_string(),
                    }),
                    chain,
                    completed: 0,
                })
            })
            .collect();

        let report = RunReport {
            outcomes,
            elapsed: started.elapsed(),
        };

        for failure in report.failures() {
            if let Err(err) = &failure.result {
                log_error(
                    "orchestrator",
                    "run_chain",
                    &err.to_string(),
                    Some(&failure.chain),
                );
            }
        }
        info!(
            chains = report.total(),
            succeeded = report.succeeded(),
            elapsed_ms = report.elapsed.as_millis() as u64,
            "All chains resolved"
        );

        report.into_result()
    }
}
