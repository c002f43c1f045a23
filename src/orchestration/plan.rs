//! # Run Plan
//!
//! Builds the job chains for one run. Building is pure: the same run id and
//! configuration always produce the same chains, and nothing is launched.
//!
//! Four groups are planned:
//!
//! - **Avro**: `specificOut -> specificIn`, `typedOut -> typedIn`
//! - **Parquet**: `avroOut -> avroSpecificIn`, `avroOut -> avroGenericIn`,
//!   `typedOut -> typedIn`
//! - **SMB**: `write -> join`, `write -> transform`
//! - **BigQuery**: three single-job chains writing run-scoped tables
//!
//! Chains that start with the same write share it; see
//! [`executor`](super::executor).

use serde::Serialize;

use super::paths::{bigquery_table, storage_path, wildcard};
use crate::config::OrchestratorConfig;
use crate::jobs::{JobId, JobInvocation};

/// Run identifier shared, read-only, by every chain of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunContext {
    run_id: String,
}

impl RunContext {
    pub fn new(run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
        }
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }
}

/// Ordered invocations; each one starts only after the previous succeeded
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobChain {
    name: String,
    invocations: Vec<JobInvocation>,
}

impl JobChain {
    pub fn new(name: impl Into<String>, invocations: Vec<JobInvocation>) -> Self {
        Self {
            name: name.into(),
            invocations,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn invocations(&self) -> &[JobInvocation] {
        &self.invocations
    }

    pub fn len(&self) -> usize {
        self.invocations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.invocations.is_empty()
    }
}

/// Chains for one data format or workflow
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobGroup {
    pub name: &'static str,
    pub chains: Vec<JobChain>,
}

/// Path builder bound to one run
struct Paths<'a> {
    prefix: &'a str,
    run_id: &'a str,
}

impl Paths<'_> {
    fn of(&self, job: JobId, stage: &str) -> String {
        storage_path(self.prefix, job.component_name(), stage, self.run_id)
    }
}

/// Plan every chain for `ctx`
pub fn build_chains(ctx: &RunContext, config: &OrchestratorConfig) -> Vec<JobGroup> {
    let paths = Paths {
        prefix: &config.storage_prefix,
        run_id: ctx.run_id(),
    };

    vec![
        avro(&paths),
        parquet(&paths),
        smb(&paths),
        bigquery(ctx, &config.bigquery_dataset),
    ]
}

/// `--method=<out>` writes, then `--method=<in>` reads everything it wrote
fn write_then_read(paths: &Paths<'_>, job: JobId, out: &str, read: &str) -> Vec<JobInvocation> {
    let written = paths.of(job, out);
    vec![
        JobInvocation::new(
            job,
            [format!("--method={out}"), format!("--output={written}")],
        ),
        JobInvocation::new(
            job,
            [
                format!("--method={read}"),
                format!("--input={}", wildcard(&written)),
                format!("--output={}", paths.of(job, read)),
            ],
        ),
    ]
}

fn avro(paths: &Paths<'_>) -> JobGroup {
    let job = JobId::AvroExample;
    JobGroup {
        name: "Avro",
        chains: vec![
            JobChain::new(
                "avro/specific",
                write_then_read(paths, job, "specificOut", "specificIn"),
            ),
            JobChain::new("avro/typed", write_then_read(paths, job, "typedOut", "typedIn")),
        ],
    }
}

fn parquet(paths: &Paths<'_>) -> JobGroup {
    let job = JobId::ParquetExample;
    JobGroup {
        name: "Parquet",
        chains: vec![
            JobChain::new(
                "parquet/avro-specific",
                write_then_read(paths, job, "avroOut", "avroSpecificIn"),
            ),
            JobChain::new(
                "parquet/avro-generic",
                write_then_read(paths, job, "avroOut", "avroGenericIn"),
            ),
            JobChain::new(
                "parquet/typed",
                write_then_read(paths, job, "typedOut", "typedIn"),
            ),
        ],
    }
}

fn smb(paths: &Paths<'_>) -> JobGroup {
    let users = paths.of(JobId::SortMergeBucketWriteExample, "users");
    let accounts = paths.of(JobId::SortMergeBucketWriteExample, "accounts");
    let inputs = [format!("--users={users}"), format!("--accounts={accounts}")];

    let write = JobInvocation::new(JobId::SortMergeBucketWriteExample, inputs.clone());
    let downstream = |job: JobId, stage: &str| {
        let mut args = inputs.to_vec();
        args.push(format!("--output={}", paths.of(job, stage)));
        JobInvocation::new(job, args)
    };

    JobGroup {
        name: "SMB",
        chains: vec![
            JobChain::new(
                "smb/join",
                vec![
                    write.clone(),
                    downstream(JobId::SortMergeBucketJoinExample, "join"),
                ],
            ),
            JobChain::new(
                "smb/transform",
                vec![
                    write,
                    downstream(JobId::SortMergeBucketTransformExample, "transform"),
                ],
            ),
        ],
    }
}

fn bigquery(ctx: &RunContext, dataset: &str) -> JobGroup {
    let single = |chain: &str, job: JobId, table: &str| {
        JobChain::new(
            chain,
            vec![JobInvocation::new(
                job,
                [format!(
                    "--output={}",
                    bigquery_table(dataset, table, ctx.run_id())
                )],
            )],
        )
    };

    JobGroup {
        name: "BigQuery",
        chains: vec![
            single(
                "bigquery/typed",
                JobId::TypedBigQueryTornadoes,
                "typed_bigquery_tornadoes",
            ),
            single(
                "bigquery/typed-storage",
                JobId::TypedStorageBigQueryTornadoes,
                "typed_storage_bigquery_tornadoes",
            ),
            single(
                "bigquery/tornadoes",
                JobId::BigQueryTornadoes,
                "bigquery_tornadoes",
            ),
        ],
    }
}
